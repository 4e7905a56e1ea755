//! convset — download, normalize and inspect conversational datasets.
//!
//! This crate wires the core layers and the dataset sources into the two
//! batch passes the binary exposes, so that integration tests can drive them
//! directly with a fake source.
//!
//! # Architecture
//!
//! ```text
//! download:  DatasetSource ──► normalize ──► store::write_dataset ──► DownloadReport
//! inspect:   store::read_dataset ──► summarize ──────────────────────► InspectionReport
//! ```
//!
//! Both passes run sequentially and isolate failures per dataset. The output
//! directory is passed in explicitly; nothing here reads global state.

pub mod download;
pub mod inspect;
