//! File source — records from a local JSON document.
//!
//! `.json` files hold one array of records (a lone object counts as a
//! single record). Any other extension is read as JSON Lines: one record per
//! line, blank lines skipped.

use crate::{DatasetSource, Fetched, SourceError};
use convset_core::{DatasetSpec, Datum};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl FileSource {
    fn read_array(path: &Path, text: &str, limit: usize) -> Result<(Vec<Datum>, u64), SourceError> {
        let value: Value = serde_json::from_str(text).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            line: 1,
            source,
        })?;
        let items = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        let total = items.len() as u64;
        Ok((items.into_iter().take(limit).map(Datum::from).collect(), total))
    }

    fn read_lines(path: &Path, text: &str, limit: usize) -> Result<(Vec<Datum>, u64), SourceError> {
        let mut records = Vec::new();
        let mut total = 0u64;
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            total += 1;
            if records.len() >= limit {
                continue;
            }
            let value: Value = serde_json::from_str(line).map_err(|source| SourceError::Json {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })?;
            records.push(Datum::from(value));
        }
        Ok((records, total))
    }
}

impl DatasetSource for FileSource {
    async fn fetch(&self, spec: &DatasetSpec) -> Result<Fetched, SourceError> {
        let path = PathBuf::from(&spec.id);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            })?;

        let limit = spec.max_records.unwrap_or(usize::MAX);
        let (records, total) = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::read_array(&path, &text, limit)?,
            _ => Self::read_lines(&path, &text, limit)?,
        };
        tracing::debug!(path = %path.display(), records = records.len(), total, "file read");

        Ok(Fetched {
            records,
            total_available: if spec.streaming { None } else { Some(total) },
        })
    }
}
