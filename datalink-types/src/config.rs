//! Configuration types shared by the client and its transports.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default API root used when no base domain override is configured.
pub const DEFAULT_API_BASE: &str = "https://data.nasdaq.com/api/v3";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "NASDAQ_DATA_LINK_API_KEY";

/// Environment variable overriding the API domain (e.g. `data.nasdaq.com`).
pub const BASE_DOMAIN_ENV: &str = "NASDAQ_DATA_LINK_BASE_DOMAIN";

/// How independent per-series fetches of a merge are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FetchStrategy {
    /// Fetch series one after another, in input order.
    #[default]
    Sequential,
    /// Issue all per-series fetches at once; results keep input order.
    Concurrent,
}

/// Retry policy applied by HTTP transports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Master switch; when false each request is attempted exactly once.
    pub use_retries: bool,
    /// Maximum number of retries after the first attempt.
    pub number_of_retries: u32,
    /// Base delay, in seconds, of the exponential backoff.
    pub retry_backoff_factor: f64,
    /// Upper bound on a single backoff delay.
    pub max_wait_between_retries: Duration,
    /// HTTP statuses that are retried.
    pub retry_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            use_retries: true,
            number_of_retries: 5,
            retry_backoff_factor: 0.5,
            max_wait_between_retries: Duration::from_secs(8),
            retry_status_codes: vec![429, 500, 501, 502, 503, 504, 505, 506, 507, 508, 509, 510, 511],
        }
    }
}

impl RetryConfig {
    /// Whether a response status should be retried under this policy.
    #[must_use]
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.use_retries && self.retry_status_codes.contains(&status)
    }
}

/// Client configuration.
///
/// A `DataLink` client holds its own copy; the process-wide default is only
/// consulted by the top-level convenience functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key sent as the `x-api-token` header.
    pub api_key: Option<String>,
    /// API root, without trailing slash.
    pub api_base: String,
    /// Optional API version advertised in the `accept` header.
    pub api_version: Option<String>,
    /// Maximum number of pages the paginator fetches per call, the first page
    /// included.
    pub page_limit: usize,
    /// URLs at or above this length are sent as POST with a JSON body.
    pub max_url_length_for_get: usize,
    /// When false, every table request is sent as POST.
    pub use_get_requests: bool,
    /// Scheduling of per-series fetches during a merge.
    pub fetch_strategy: FetchStrategy,
    /// Per-request timeout enforced by the transport.
    pub request_timeout: Option<Duration>,
    /// Retry policy enforced by the transport.
    pub retry: RetryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: None,
            page_limit: 100,
            max_url_length_for_get: 8000,
            use_get_requests: true,
            fetch_strategy: FetchStrategy::default(),
            request_timeout: None,
            retry: RetryConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Defaults overlaid with `NASDAQ_DATA_LINK_API_KEY` and
    /// `NASDAQ_DATA_LINK_BASE_DOMAIN` when they are set and non-empty.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            cfg.api_key = Some(key.trim().to_string());
        }
        if let Ok(domain) = std::env::var(BASE_DOMAIN_ENV)
            && !domain.trim().is_empty()
        {
            cfg.api_base = format!("https://{}/api/v3", domain.trim().trim_end_matches('/'));
        }
        cfg
    }

    /// Copy of this config with `api_key` replaced.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}
