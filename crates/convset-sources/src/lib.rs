//! convset-sources — dataset source adapters for convset.
//!
//! Each source takes a [`DatasetSpec`] and hands back up to
//! `spec.max_records` loosely-typed records as [`Datum`] values, in source
//! order. Sources never normalize; that is the pipeline's job.
//!
//! - [`hub::HubSource`] pages through a datasets-server style rows API.
//! - [`file::FileSource`] reads a local `.json` array or `.jsonl` file.
//! - [`Sources`] dispatches on [`DatasetSpec::source`].

pub mod cells;
pub mod file;
pub mod hub;

use convset_core::config::HubConfig;
use convset_core::{DatasetSpec, Datum, SourceKind};
use std::path::PathBuf;

pub use file::FileSource;
pub use hub::HubSource;

/// Records pulled from a source for one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub records: Vec<Datum>,
    /// Size of the whole split, when known and the entry is not streaming.
    pub total_available: Option<u64>,
}

/// Trait implemented by each dataset source.
#[allow(async_fn_in_trait)]
pub trait DatasetSource {
    /// Pull at most `spec.max_records` records, in source order.
    async fn fetch(&self, spec: &DatasetSpec) -> Result<Fetched, SourceError>;
}

/// Retrieval failure for one dataset. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("dataset {dataset} has no split named {split:?}")]
    SplitNotFound { dataset: String, split: String },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: line {line}: {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Every source the catalog can name, dispatched per spec.
pub struct Sources {
    hub: HubSource,
    file: FileSource,
}

impl Sources {
    pub fn new(hub: &HubConfig) -> Result<Self, SourceError> {
        Ok(Self {
            hub: HubSource::new(hub)?,
            file: FileSource,
        })
    }
}

impl DatasetSource for Sources {
    async fn fetch(&self, spec: &DatasetSpec) -> Result<Fetched, SourceError> {
        match spec.source {
            SourceKind::Hub => self.hub.fetch(spec).await,
            SourceKind::File => self.file.fetch(spec).await,
        }
    }
}
