//! Fake datasets-server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /splits?dataset=ID` — the config/split pairs of a registered dataset
//! - `GET /rows?dataset=ID&config=C&split=S&offset=O&length=L` — one page of rows
//!
//! Like the real service it rejects `length > 100` with 422 and answers
//! unknown datasets with 404 and an `{"error": ...}` body. Every `/rows`
//! request is recorded so tests can assert on paging.
//!
//! # Example
//!
//! ```rust,ignore
//! let hub = FakeHub::start().await.unwrap();
//! hub.add_dataset("org/chats", "default", "train", hub_features(), hub_rows(250)).await;
//! // Point a HubSource at hub.base_url()
//! ```

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

const MAX_LENGTH: usize = 100;

struct FakeDataset {
    config: String,
    split: String,
    features: Value,
    rows: Vec<Value>,
    /// Forced error answer for every request on this dataset.
    failure: Option<(StatusCode, String)>,
}

/// One recorded `/rows` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsRequest {
    pub dataset: String,
    pub config: String,
    pub split: String,
    pub offset: usize,
    pub length: usize,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct HubState {
    datasets: HashMap<String, FakeDataset>,
    rows_requests: Vec<RowsRequest>,
    splits_requests: usize,
}

type Shared = Arc<Mutex<HubState>>;

/// Handle to the running fake hub.
pub struct FakeHub {
    addr: SocketAddr,
    state: Shared,
}

impl FakeHub {
    /// Start the fake hub on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(HubState::default()));

        let app = Router::new()
            .route("/splits", get(splits))
            .route("/rows", get(rows))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Register a dataset with a single config/split pair.
    pub async fn add_dataset(&self, id: &str, config: &str, split: &str, features: Value, rows: Vec<Value>) {
        self.state.lock().await.datasets.insert(
            id.to_string(),
            FakeDataset {
                config: config.to_string(),
                split: split.to_string(),
                features,
                rows,
                failure: None,
            },
        );
    }

    /// Make every request for `id` answer `status` with an error body.
    pub async fn fail_with(&self, id: &str, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).unwrap();
        let mut state = self.state.lock().await;
        let dataset = state.datasets.entry(id.to_string()).or_insert_with(|| FakeDataset {
            config: "default".to_string(),
            split: "train".to_string(),
            features: json!([]),
            rows: Vec::new(),
            failure: None,
        });
        dataset.failure = Some((status, message.to_string()));
    }

    pub async fn rows_requests(&self) -> Vec<RowsRequest> {
        self.state.lock().await.rows_requests.clone()
    }

    pub async fn splits_requests(&self) -> usize {
        self.state.lock().await.splits_requests
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

async fn splits(State(state): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    let mut state = state.lock().await;
    state.splits_requests += 1;

    let Some(dataset) = q.get("dataset").and_then(|id| state.datasets.get(id)) else {
        return error(StatusCode::NOT_FOUND, "The dataset does not exist.");
    };
    if let Some((status, message)) = &dataset.failure {
        return error(*status, message);
    }
    Json(json!({
        "splits": [{
            "dataset": q["dataset"],
            "config": dataset.config,
            "split": dataset.split,
        }],
        "pending": [],
        "failed": [],
    }))
    .into_response()
}

async fn rows(
    State(state): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().await;

    let field = |name: &str| q.get(name).cloned().unwrap_or_default();
    let request = RowsRequest {
        dataset: field("dataset"),
        config: field("config"),
        split: field("split"),
        offset: field("offset").parse().unwrap_or(0),
        length: field("length").parse().unwrap_or(MAX_LENGTH),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.rows_requests.push(request.clone());

    if request.length > MAX_LENGTH {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Parameter 'length' must not be greater than 100",
        );
    }
    let Some(dataset) = state.datasets.get(&request.dataset) else {
        return error(StatusCode::NOT_FOUND, "The dataset does not exist.");
    };
    if let Some((status, message)) = &dataset.failure {
        return error(*status, message);
    }
    if dataset.config != request.config || dataset.split != request.split {
        return error(StatusCode::NOT_FOUND, "The config or split does not exist.");
    }

    let page: Vec<Value> = dataset
        .rows
        .iter()
        .enumerate()
        .skip(request.offset)
        .take(request.length)
        .map(|(i, row)| json!({"row_idx": i, "row": row, "truncated_cells": []}))
        .collect();

    Json(json!({
        "features": dataset.features,
        "rows": page,
        "num_rows_total": dataset.rows.len(),
        "num_rows_per_page": MAX_LENGTH,
        "partial": false,
    }))
    .into_response()
}
