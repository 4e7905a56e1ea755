//! Hub source — pages through a datasets-server style rows API.
//!
//! Endpoints used:
//!
//! - `GET /splits?dataset=ID` — resolves the config (subset) exposing the
//!   requested split, when the catalog entry does not name one.
//! - `GET /rows?dataset=ID&config=C&split=S&offset=O&length=L` — one page of
//!   rows plus the column `features` and `num_rows_total`.
//!
//! Pages are fetched one after another until the sample size cutoff or the
//! end of the split. There is no retry: a failed request fails the dataset.

use crate::cells::lift_row;
use crate::{DatasetSource, Fetched, SourceError};
use convset_core::config::HubConfig;
use convset_core::DatasetSpec;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Largest page the rows API serves.
pub const MAX_PAGE_SIZE: usize = 100;

const ERROR_BODY_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SplitsResponse {
    splits: Vec<SplitEntry>,
}

#[derive(Debug, Deserialize)]
struct SplitEntry {
    config: String,
    split: String,
}

#[derive(Debug, Deserialize)]
struct RowsResponse {
    #[serde(default)]
    features: Vec<FeatureEntry>,
    rows: Vec<RowEntry>,
    #[serde(default)]
    num_rows_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct FeatureEntry {
    name: String,
    #[serde(rename = "type")]
    kind: Value,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ---------------------------------------------------------------------------
// HubSource
// ---------------------------------------------------------------------------

pub struct HubSource {
    client: reqwest::Client,
    endpoint: String,
    page_size: usize,
    token: Option<String>,
}

impl HubSource {
    pub fn new(config: &HubConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("convset/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            page_size: config.page_size.clamp(1, MAX_PAGE_SIZE),
            token: config.token(),
        })
    }

    /// Override the access token picked up from the environment.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.endpoint, path);
        let mut request = self.client.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| SourceError::Http {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| SourceError::Http {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| body.chars().take(ERROR_BODY_CHARS).collect());
            return Err(SourceError::Status { url, status, message });
        }
        serde_json::from_str(&body).map_err(|source| SourceError::Decode { url, source })
    }

    /// Config name to query: the catalog entry's own, or the first one exposing the split.
    async fn resolve_config(&self, spec: &DatasetSpec) -> Result<String, SourceError> {
        if let Some(config) = &spec.config {
            return Ok(config.clone());
        }
        let splits: SplitsResponse = self
            .get_json("/splits", &[("dataset", spec.id.clone())])
            .await?;
        splits
            .splits
            .into_iter()
            .find(|s| s.split == spec.split)
            .map(|s| s.config)
            .ok_or_else(|| SourceError::SplitNotFound {
                dataset: spec.id.clone(),
                split: spec.split.clone(),
            })
    }
}

impl DatasetSource for HubSource {
    async fn fetch(&self, spec: &DatasetSpec) -> Result<Fetched, SourceError> {
        let config = self.resolve_config(spec).await?;
        tracing::debug!(dataset = %spec.id, config = %config, split = %spec.split, "resolved config");

        let mut records = Vec::new();
        let mut total: Option<u64> = None;
        let mut offset = 0usize;

        loop {
            let want = match spec.max_records {
                Some(max) => max.saturating_sub(records.len()).min(self.page_size),
                None => self.page_size,
            };
            if want == 0 {
                break;
            }

            let page: RowsResponse = self
                .get_json(
                    "/rows",
                    &[
                        ("dataset", spec.id.clone()),
                        ("config", config.clone()),
                        ("split", spec.split.clone()),
                        ("offset", offset.to_string()),
                        ("length", want.to_string()),
                    ],
                )
                .await?;
            total = total.or(page.num_rows_total);

            let features: Map<String, Value> = page
                .features
                .into_iter()
                .map(|f| (f.name, f.kind))
                .collect();
            let got = page.rows.len().min(want);
            records.extend(
                page.rows
                    .into_iter()
                    .take(want)
                    .map(|r| lift_row(r.row, &features)),
            );
            offset += got;
            tracing::debug!(dataset = %spec.id, offset, got, "page fetched");

            let exhausted = total.is_some_and(|t| offset as u64 >= t);
            if got < want || exhausted {
                break;
            }
        }

        Ok(Fetched {
            records,
            total_available: if spec.streaming { None } else { total },
        })
    }
}
