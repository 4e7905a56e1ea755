//! Download pass — source → normalizer → store, one dataset at a time.
//!
//! Every catalog entry ends up as one [`Outcome`] in the returned
//! [`DownloadReport`]; a retrieval or write failure is recorded and the batch
//! moves on to the next dataset.

use convset_core::inspector::overview;
use convset_core::normalizer::normalize_all;
use convset_core::report::{DownloadReport, Downloaded, Entry, Outcome};
use convset_core::store::{list_datasets, write_dataset};
use convset_core::{DatasetSpec, StoreError};
use convset_sources::{DatasetSource, SourceError};
use std::path::PathBuf;

/// Knobs shared by every dataset in one batch.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub indent: usize,
    /// Overrides every entry's `max_records` when set.
    pub limit: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Download every catalog entry in order and report on each one.
pub async fn run<S: DatasetSource>(
    source: &S,
    specs: &[DatasetSpec],
    options: &DownloadOptions,
) -> DownloadReport {
    let mut entries = Vec::with_capacity(specs.len());

    for (i, spec) in specs.iter().enumerate() {
        let mut spec = spec.clone();
        if let Some(limit) = options.limit {
            spec.max_records = Some(limit);
        }
        tracing::info!(
            dataset = %spec.name,
            id = %spec.id,
            max_records = ?spec.max_records,
            "[{}/{}] downloading",
            i + 1,
            specs.len()
        );

        let outcome: Outcome<Downloaded> = download_one(source, &spec, options).await.into();
        match &outcome {
            Outcome::Done(d) => tracing::info!(dataset = %spec.name, records = d.records, "saved"),
            Outcome::Failed { reason } => {
                tracing::warn!(dataset = %spec.name, %reason, "download failed")
            }
        }
        entries.push(Entry {
            name: spec.name.clone(),
            outcome,
        });
    }

    let files = list_datasets(&options.output_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not list output directory");
        Vec::new()
    });

    DownloadReport {
        output_dir: std::path::absolute(&options.output_dir)
            .unwrap_or_else(|_| options.output_dir.clone()),
        entries,
        files,
    }
}

async fn download_one<S: DatasetSource>(
    source: &S,
    spec: &DatasetSpec,
    options: &DownloadOptions,
) -> Result<Downloaded, DownloadError> {
    let fetched = source.fetch(spec).await?;
    let records = normalize_all(&fetched.records);

    let path = options.output_dir.join(spec.file_name());
    write_dataset(&path, &records, options.indent)?;

    let first = records.first();
    Ok(Downloaded {
        id: spec.id.clone(),
        path,
        records: records.len(),
        total_available: fetched.total_available,
        fields: first
            .and_then(|r| r.as_object())
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default(),
        overview: first.map(overview).unwrap_or_default(),
    })
}
