//! Inspection pass — summarize every dataset document in a directory.

use convset_core::report::{Entry, InspectionReport, Outcome};
use convset_core::store::{list_datasets, read_dataset};
use convset_core::{summarize, InspectError, Summary};
use std::path::Path;

/// Summarize every `*.json` document in `dir`, in file name order. A file
/// that cannot be read or summarized becomes a failed entry.
pub fn run(dir: &Path) -> InspectionReport {
    let files = list_datasets(dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not list dataset directory");
        Vec::new()
    });
    tracing::info!(dir = %dir.display(), datasets = files.len(), "inspecting");

    let entries = files
        .into_iter()
        .map(|file| {
            let outcome: Outcome<Summary> = inspect_file(&file.path).into();
            if let Outcome::Failed { reason } = &outcome {
                tracing::warn!(file = %file.name, %reason, "inspection failed");
            }
            Entry {
                name: file.name,
                outcome,
            }
        })
        .collect();

    InspectionReport {
        dir: std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf()),
        entries,
    }
}

/// Read one document and summarize it.
pub fn inspect_file(path: &Path) -> Result<Summary, InspectError> {
    let records = read_dataset(path)?;
    summarize(&records)
}
