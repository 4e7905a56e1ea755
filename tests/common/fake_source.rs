//! In-memory [`DatasetSource`] for pipeline tests.
//!
//! Datasets are keyed by [`DatasetSpec::id`]. An id registered with
//! [`FakeSource::failing`] returns a retrieval error, and an unregistered id
//! fails with a 404 status error, so batch failure isolation can be tested
//! without a network.

use convset_core::{DatasetSpec, Datum};
use convset_sources::{DatasetSource, Fetched, SourceError};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeSource {
    datasets: HashMap<String, Vec<Datum>>,
    failing: HashMap<String, String>,
    /// Ids in the order they were fetched.
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, records: Vec<Datum>) -> Self {
        self.datasets.insert(id.to_string(), records);
        self
    }

    pub fn failing(mut self, id: &str, message: &str) -> Self {
        self.failing.insert(id.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DatasetSource for FakeSource {
    async fn fetch(&self, spec: &DatasetSpec) -> Result<Fetched, SourceError> {
        self.calls.lock().unwrap().push(spec.id.clone());

        if let Some(message) = self.failing.get(&spec.id) {
            return Err(SourceError::Status {
                url: format!("fake://{}", spec.id),
                status: reqwest::StatusCode::BAD_GATEWAY,
                message: message.clone(),
            });
        }
        let Some(records) = self.datasets.get(&spec.id) else {
            return Err(SourceError::Status {
                url: format!("fake://{}", spec.id),
                status: reqwest::StatusCode::NOT_FOUND,
                message: "The dataset does not exist.".to_string(),
            });
        };

        let limit = spec.max_records.unwrap_or(usize::MAX);
        Ok(Fetched {
            records: records.iter().take(limit).cloned().collect(),
            total_available: if spec.streaming { None } else { Some(records.len() as u64) },
        })
    }
}
