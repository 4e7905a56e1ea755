//! convset-core — record model and pipeline layers for convset.
//!
//! This crate holds everything that does not touch the network: the
//! loosely-typed record value sources produce, the normalizer that turns it
//! into JSON, the on-disk store, the inspector that summarizes a stored
//! dataset, and the batch reports both passes render.
//!
//! # Architecture
//!
//! ```text
//! Source ──► Normalizer ──► Store ──► Inspector
//!   │                         │           │
//!   └───── DownloadReport ◄───┘           └──► InspectionReport
//! ```
//!
//! Both passes are sequential and keep going past a failed dataset; each
//! dataset ends up as one [`report::Outcome`].

pub mod config;
pub mod error;
pub mod inspector;
pub mod normalizer;
pub mod report;
pub mod store;
pub mod types;

pub use error::{InspectError, StoreError};
pub use inspector::{summarize, Summary};
pub use normalizer::normalize;
pub use types::{DatasetSpec, Datum, SourceKind};
