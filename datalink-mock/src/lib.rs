//! Test doubles for the datalink `Transport` trait.
//!
//! - [`MockTransport`] answers from static fixtures shaped like the live
//!   service and keeps a log of every request.
//! - [`DynamicMockTransport`] defers to per-path behaviors scripted by a test
//!   through its [`DynamicMockController`].

use std::path::Path;

use async_trait::async_trait;
use datalink_core::{
    ApiRequest, ApiResponse, DataLinkError, Download, HttpMethod, Transport, download_target,
    error_from_response,
};
use serde_json::Value;
use tokio::sync::Mutex;

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockTransport, MockBehavior};

/// Read a request parameter from the query string (GET) or JSON body (POST).
///
/// Array markers are ignored, so `ticker` also matches `ticker[]`.
#[must_use]
pub fn request_param(request: &ApiRequest, key: &str) -> Option<String> {
    match request.method {
        HttpMethod::Get => request
            .query
            .iter()
            .find(|(k, _)| k == key || k.strip_suffix("[]") == Some(key))
            .map(|(_, v)| v.clone()),
        HttpMethod::Post => request.body.as_ref()?.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    }
}

/// Fixture-backed transport for CI-safe tests. Deterministic, no network.
///
/// Known series: `NSE/OIL`, `WIKI/AAPL`, `WIKI/MSFT`, `BAD/RAGGED`. Known
/// table: `ZACKS/FC` (three cursor-chained pages, also served for
/// point-in-time paths). The `databases` and `datasets` listings are paged
/// two entries at a time, and `NSE`/`WIKI` have bulk archives. Codes under
/// the `FAIL` database fail at the transport level; anything else is a 404.
#[derive(Default)]
pub struct MockTransport {
    log: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// New transport with an empty request log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.log.lock().await.len()
    }

    fn series(db: &str, ds: &str) -> Option<Value> {
        match (db, ds) {
            ("NSE", "OIL") => Some(fixtures::datasets::oil()),
            ("WIKI", "AAPL") => Some(fixtures::datasets::sample()),
            ("WIKI", "MSFT") => Some(fixtures::datasets::sample_shifted()),
            ("BAD", "RAGGED") => Some(fixtures::datasets::ragged()),
            _ => None,
        }
    }

    fn dataset_data(request: &ApiRequest, mut body: Value) -> Value {
        let data = &mut body["dataset_data"];
        if let Some(index) = request_param(request, "column_index") {
            let width = data["column_names"].as_array().map_or(0, Vec::len);
            match index.parse::<usize>() {
                Ok(i) if i >= 1 && i < width => {
                    let project = |row: &Value| Value::Array(vec![row[0].clone(), row[i].clone()]);
                    data["column_names"] = project(&data["column_names"]);
                    let rows: Vec<Value> = data["data"]
                        .as_array()
                        .map(|rows| rows.iter().map(project).collect())
                        .unwrap_or_default();
                    data["data"] = Value::Array(rows);
                }
                _ => return fixtures::datasets::missing_column(),
            }
            data["column_index"] = Value::from(index.parse::<i64>().unwrap_or_default());
        }
        if request_param(request, "order").as_deref() == Some("desc")
            && let Some(rows) = data["data"].as_array_mut()
        {
            rows.reverse();
            data["order"] = Value::from("desc");
        }
        body
    }

    fn page(request: &ApiRequest) -> usize {
        request_param(request, "page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1)
    }

    fn route(request: &ApiRequest) -> Result<ApiResponse, DataLinkError> {
        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        let found = match segments.as_slice() {
            ["datasets", "FAIL", ..] => {
                return Err(DataLinkError::Transport("forced failure".into()));
            }
            ["datasets", db, ds, "data"] => {
                Self::series(db, ds).map(|body| Self::dataset_data(request, body))
            }
            ["datasets", db, ds, "metadata"] => Self::series(db, ds)
                .map(|_| fixtures::metadata::dataset(db, ds)),
            ["databases"] => Some(fixtures::catalogue::database_list(Self::page(request))),
            ["datasets"] => request_param(request, "database_code")
                .map(|db| fixtures::catalogue::dataset_list(&db, Self::page(request))),
            ["databases", code] => (*code == "NSE" || *code == "WIKI")
                .then(|| fixtures::metadata::database(code)),
            ["databases", code, "data"] if *code == "NSE" || *code == "WIKI" => {
                return Ok(ApiResponse {
                    status: 200,
                    body: fixtures::catalogue::BULK_ARCHIVE.to_string(),
                });
            }
            ["datatables", "ZACKS", "FC", "metadata"] => {
                Some(fixtures::metadata::datatable("ZACKS", "FC"))
            }
            ["datatables", "ZACKS", "FC"] | ["pit", "ZACKS", "FC", ..] => {
                let cursor = request_param(request, "qopts.cursor_id");
                fixtures::datatables::page_for_cursor(cursor.as_deref())
            }
            _ => None,
        };
        Ok(found.map_or_else(fixtures::errors::not_found, |body| ApiResponse::ok(&body)))
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "datalink-mock"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DataLinkError> {
        let response = Self::route(&request);
        self.log.lock().await.push(request);
        response
    }

    async fn download(&self, request: ApiRequest, dest: &Path) -> Result<Download, DataLinkError> {
        let url = request.url();
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(response.status, &response.body));
        }
        let path = download_target(dest, &url);
        std::fs::write(&path, response.body.as_bytes()).map_err(|e| {
            DataLinkError::Transport(format!("cannot write '{}': {e}", path.display()))
        })?;
        Ok(Download {
            path,
            bytes: response.body.len() as u64,
        })
    }
}
