//! Transport contract between the client and the wire.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use datalink_types::{ApiErrorDetails, DataLinkError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{HttpMethod, encode_query};

/// A fully prepared request: verb, absolute base, relative path, and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Verb chosen by the request-shape selector.
    pub method: HttpMethod,
    /// API root without trailing slash.
    pub base: String,
    /// Path relative to `base`, without leading slash.
    pub path: String,
    /// Query pairs; empty for POST.
    pub query: Vec<(String, String)>,
    /// JSON body; `None` for GET.
    pub body: Option<Value>,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// `GET {base}/{path}` with no parameters.
    #[must_use]
    pub fn get(base: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            base: base.into(),
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Absolute URL including the encoded query string.
    #[must_use]
    pub fn url(&self) -> String {
        let base = self.base.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        if self.query.is_empty() {
            format!("{base}/{path}")
        } else {
            format!("{base}/{path}?{}", encode_query(&self.query))
        }
    }

    /// Value of the first header called `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Values of every query pair called `key`.
    #[must_use]
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Raw response as received from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl ApiResponse {
    /// Successful JSON response.
    #[must_use]
    pub fn ok(body: &Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body of a successful response, or map a failure to the
    /// error taxonomy.
    ///
    /// # Errors
    /// Returns the taxonomy error for non-2xx statuses and `Decode` for a
    /// body that is not JSON.
    pub fn into_json(self) -> Result<Value, DataLinkError> {
        if !self.is_success() {
            return Err(error_from_response(self.status, &self.body));
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(alias = "quandl_error")]
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Map a non-2xx response to the error taxonomy.
///
/// The body is expected to look like `{"error": {"code": .., "message": ..}}`
/// (the legacy `quandl_error` key is accepted). Anything else becomes a
/// generic [`DataLinkError::Api`] carrying the status and raw body.
#[must_use]
pub fn error_from_response(status: u16, body: &str) -> DataLinkError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => {
            let mut details = ApiErrorDetails::new(env.error.message.unwrap_or_default())
                .with_status(status)
                .with_body(body);
            match env.error.code {
                Some(code) => {
                    details = details.with_code(code.clone());
                    DataLinkError::from_error_code(&code, details)
                }
                None => DataLinkError::Api(details),
            }
        }
        Err(_) => DataLinkError::Api(
            ApiErrorDetails::new("")
                .with_status(status)
                .with_body(body),
        ),
    }
}

/// A response body written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// File the body was written to.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: u64,
}

/// File a download to `dest` is written to.
///
/// An existing directory receives a file named after the last path segment
/// of `final_url` (the URL after redirects); any other `dest` is used as is.
#[must_use]
pub fn download_target(dest: &Path, final_url: &str) -> PathBuf {
    if !dest.is_dir() {
        return dest.to_path_buf();
    }
    let name = url::Url::parse(final_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "download".to_string());
    dest.join(name)
}

/// Sends prepared requests. Implemented by the HTTP transport and by test doubles.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Perform one request and return the raw response.
    ///
    /// Implementations return `Err` only when no response was received;
    /// non-2xx statuses come back as `Ok` and are mapped by the caller.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DataLinkError>;

    /// Perform one request and stream a successful body into a file.
    ///
    /// The target file is chosen with [`download_target`]. Non-2xx statuses
    /// are mapped with [`error_from_response`] and nothing is written.
    ///
    /// # Errors
    /// The default implementation always fails with `Transport`.
    async fn download(&self, request: ApiRequest, dest: &Path) -> Result<Download, DataLinkError> {
        let _ = (request, dest);
        Err(DataLinkError::Transport(format!(
            "{} transport does not support file downloads",
            self.name()
        )))
    }
}
