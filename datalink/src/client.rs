use std::sync::Arc;
use std::time::Duration;

use datalink_core::codec::{HttpMethod, RequestStyle};
use datalink_core::{
    ApiRequest, DataLinkError, Params, Transport, flatten_params, post_body, query_pairs,
    request_method,
};
use datalink_types::{ApiConfig, FetchStrategy, RetryConfig};
use serde_json::Value;

/// Value sent as the `request-source` header.
pub const REQUEST_SOURCE: &str = "rust";

/// Client for the Data Link API.
///
/// Holds its own [`ApiConfig`] snapshot and the [`Transport`] every request is
/// sent through. Cloning is cheap: the transport is shared.
#[derive(Clone)]
pub struct DataLink {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) cfg: ApiConfig,
}

impl core::fmt::Debug for DataLink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataLink")
            .field("transport", &self.transport.name())
            .field("api_base", &self.cfg.api_base)
            .field("has_api_key", &self.cfg.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`DataLink`] client with custom configuration.
pub struct DataLinkBuilder {
    transport: Option<Arc<dyn Transport>>,
    cfg: ApiConfig,
}

impl Default for DataLinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLinkBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Behavior and trade-offs:
    /// - Starts from [`ApiConfig::default`]; environment variables are not read
    ///   unless [`from_env`](Self::from_env) is called.
    /// - Without an explicit [`transport`](Self::transport), `build` creates the
    ///   HTTP transport (requires the `http` feature).
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: None,
            cfg: ApiConfig::default(),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replace the configuration with [`ApiConfig::from_env`].
    ///
    /// Behavior: reads `NASDAQ_DATA_LINK_API_KEY` and
    /// `NASDAQ_DATA_LINK_BASE_DOMAIN`; unset variables keep the defaults.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        self.cfg = ApiConfig::from_env();
        self
    }

    /// Set the API key sent as `x-api-token`.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.cfg.api_key = Some(key.into());
        self
    }

    /// Override the API root (e.g. a staging host or a local mock server).
    #[must_use]
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.cfg.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Advertise an API version in the `accept` header.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.cfg.api_version = Some(version.into());
        self
    }

    /// Maximum number of pages followed by the table paginator.
    ///
    /// Behavior and trade-offs:
    /// - Regular tables stop with a `PageLimitReached` warning and return the
    ///   pages fetched so far.
    /// - Point-in-time tables fail with `LimitExceeded` instead.
    #[must_use]
    pub const fn page_limit(mut self, limit: usize) -> Self {
        self.cfg.page_limit = limit;
        self
    }

    /// URLs at or above this length are sent as POST with a JSON body.
    #[must_use]
    pub const fn max_url_length_for_get(mut self, len: usize) -> Self {
        self.cfg.max_url_length_for_get = len;
        self
    }

    /// When false, every table request is sent as POST.
    #[must_use]
    pub const fn use_get_requests(mut self, yes: bool) -> Self {
        self.cfg.use_get_requests = yes;
        self
    }

    /// Select how per-series fetches of a merge are scheduled.
    ///
    /// Behavior and trade-offs:
    /// - `Sequential`: one request at a time, in input order; gentlest on rate limits.
    /// - `Concurrent`: all series at once; lower latency, more simultaneous requests.
    ///   Results keep input order either way.
    #[must_use]
    pub const fn fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.cfg.fetch_strategy = strategy;
        self
    }

    /// Per-request timeout applied by the HTTP transport.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Retry policy applied by the HTTP transport.
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.cfg.retry = retry;
        self
    }

    /// Send requests through a custom transport instead of HTTP.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no transport was supplied and the `http`
    /// feature is disabled, or `Transport` if the HTTP client cannot be built.
    pub fn build(self) -> Result<DataLink, DataLinkError> {
        let transport = match self.transport {
            Some(t) => t,
            None => default_transport(&self.cfg)?,
        };
        Ok(DataLink {
            transport,
            cfg: self.cfg,
        })
    }
}

#[cfg(feature = "http")]
fn default_transport(cfg: &ApiConfig) -> Result<Arc<dyn Transport>, DataLinkError> {
    Ok(Arc::new(datalink_http::HttpTransport::new(cfg)?))
}

#[cfg(not(feature = "http"))]
fn default_transport(_cfg: &ApiConfig) -> Result<Arc<dyn Transport>, DataLinkError> {
    Err(DataLinkError::invalid_arg(
        "no transport configured; enable the `http` feature or call transport(...)",
    ))
}

impl DataLink {
    /// Start building a new client.
    ///
    /// ```rust,ignore
    /// use datalink::{DataLink, FetchStrategy};
    ///
    /// let client = DataLink::builder()
    ///     .api_key("my-key")
    ///     .fetch_strategy(FetchStrategy::Concurrent)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> DataLinkBuilder {
        DataLinkBuilder::new()
    }

    /// Client over the given configuration with the default transport.
    ///
    /// # Errors
    /// See [`DataLinkBuilder::build`].
    pub fn new(cfg: ApiConfig) -> Result<Self, DataLinkError> {
        DataLinkBuilder::new().config(cfg).build()
    }

    /// Configuration snapshot used by this client.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.cfg
    }

    /// Name of the underlying transport.
    #[must_use]
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Copy of this client sending `key` instead of the configured API key.
    #[must_use]
    pub fn with_api_key(&self, key: impl Into<String>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cfg: self.cfg.clone().with_api_key(key),
        }
    }

    /// Headers attached to every request.
    pub(crate) fn headers(&self) -> Vec<(String, String)> {
        let mut accept = String::from("application/json");
        if let Some(version) = &self.cfg.api_version {
            accept.push_str(", application/vnd.data.nasdaq+json;version=");
            accept.push_str(version);
        }
        let mut headers = vec![("accept".to_string(), accept)];
        if let Some(key) = &self.cfg.api_key {
            headers.push(("x-api-token".to_string(), key.clone()));
        }
        headers.push(("request-source".to_string(), REQUEST_SOURCE.to_string()));
        headers.push((
            "request-source-version".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        ));
        headers
    }

    /// Prepare a request for `path` with `params` under the given verb.
    pub(crate) fn prepare(&self, method: HttpMethod, path: String, params: &Params) -> ApiRequest {
        let (query, body) = match method {
            HttpMethod::Get => (
                query_pairs(&flatten_params(params, RequestStyle::Get)),
                None,
            ),
            HttpMethod::Post => (Vec::new(), Some(post_body(params))),
        };
        ApiRequest {
            method,
            base: self.cfg.api_base.clone(),
            path,
            query,
            body,
            headers: self.headers(),
        }
    }

    /// Send one request and decode its JSON body.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink::client::send",
            skip(self, params),
            fields(transport = self.transport.name(), method = method.as_str()),
        )
    )]
    pub(crate) async fn send(
        &self,
        method: HttpMethod,
        path: String,
        params: &Params,
    ) -> Result<Value, DataLinkError> {
        let request = self.prepare(method, path, params);
        self.transport.send(request).await?.into_json()
    }

    /// `GET` regardless of URL length.
    pub(crate) async fn get_json(&self, path: String, params: &Params) -> Result<Value, DataLinkError> {
        self.send(HttpMethod::Get, path, params).await
    }

    /// `GET`, or `POST` when the URL would be too long or GET is disabled.
    pub(crate) async fn table_json(
        &self,
        path: String,
        params: &Params,
    ) -> Result<Value, DataLinkError> {
        let method = request_method(
            &self.cfg.api_base,
            &path,
            params,
            self.cfg.max_url_length_for_get,
            self.cfg.use_get_requests,
        );
        self.send(method, path, params).await
    }
}
