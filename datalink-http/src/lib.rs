//! datalink-http
//!
//! `Transport` implementation over `reqwest`, with the retry policy from
//! `ApiConfig::retry` applied through `reqwest-retry` middleware and the
//! per-request timeout from `ApiConfig::request_timeout`. Downloads are
//! streamed to disk chunk by chunk.
#![warn(missing_docs)]

mod retry;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use datalink_core::{
    ApiConfig, ApiRequest, ApiResponse, DataLinkError, Download, HttpMethod, Transport,
    download_target, error_from_response,
};
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use tokio::io::AsyncWriteExt;
use reqwest_retry::RetryTransientMiddleware;

pub use retry::{StatusRetryStrategy, backoff_policy};

/// HTTP transport used by default in production.
#[derive(Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
}

impl HttpTransport {
    /// Static name reported in logs.
    pub const NAME: &'static str = "datalink-http";

    /// Transport configured from `config` (timeout and retry policy).
    ///
    /// # Errors
    /// Returns `Transport` if the underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, DataLinkError> {
        Self::builder().config(config).build()
    }

    /// Start a builder with default settings.
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    fn prepare(&self, request: &ApiRequest) -> Result<RequestBuilder, DataLinkError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, request.url());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_string(body)?);
        }
        Ok(builder)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink_http::send",
            skip(self, request),
            fields(method = request.method.as_str(), path = %request.path),
        )
    )]
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, DataLinkError> {
        let response = self
            .prepare(&request)?
            .send()
            .await
            .map_err(|e| DataLinkError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DataLinkError::Transport(e.to_string()))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(ApiResponse { status, body })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink_http::download",
            skip(self, request, dest),
            fields(path = %request.path),
        )
    )]
    async fn stream_to_file(
        &self,
        request: ApiRequest,
        dest: &Path,
    ) -> Result<Download, DataLinkError> {
        let transport_err = |e: reqwest::Error| DataLinkError::Transport(e.to_string());
        let mut response = self
            .prepare(&request)?
            .send()
            .await
            .map_err(|e| DataLinkError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.map_err(transport_err)?;
            return Err(error_from_response(status, &body));
        }

        let path = download_target(dest, response.url().as_str());
        let write_err = |e: std::io::Error| {
            DataLinkError::Transport(format!("cannot write '{}': {e}", path.display()))
        };
        let mut file = tokio::fs::File::create(&path).await.map_err(write_err)?;
        let mut bytes = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(transport_err)? {
            file.write_all(&chunk).await.map_err(write_err)?;
            bytes += chunk.len() as u64;
        }
        file.flush().await.map_err(write_err)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(bytes, file = %path.display(), "download written");
        Ok(Download { path, bytes })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DataLinkError> {
        self.execute(request).await
    }

    async fn download(&self, request: ApiRequest, dest: &Path) -> Result<Download, DataLinkError> {
        self.stream_to_file(request, dest).await
    }
}

/// Builder for [`HttpTransport`].
#[derive(Default)]
pub struct HttpTransportBuilder {
    config: ApiConfig,
    client: Option<reqwest::Client>,
}

impl HttpTransportBuilder {
    /// Take timeout and retry settings from `config`.
    #[must_use]
    pub fn config(mut self, config: &ApiConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Disable retries entirely.
    #[must_use]
    pub const fn no_retries(mut self) -> Self {
        self.config.retry.use_retries = false;
        self
    }

    /// Use a preconfigured `reqwest::Client`; the timeout setting is then ignored.
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    /// Returns `Transport` if the `reqwest` client cannot be built.
    pub fn build(self) -> Result<HttpTransport, DataLinkError> {
        let client = match self.client {
            Some(c) => c,
            None => {
                let mut b = reqwest::Client::builder();
                if let Some(t) = self.config.request_timeout {
                    b = b.timeout(t);
                }
                b.build()
                    .map_err(|e| DataLinkError::Transport(e.to_string()))?
            }
        };
        let retry = &self.config.retry;
        let client = if retry.use_retries && retry.number_of_retries > 0 {
            let strategy = StatusRetryStrategy::new(retry.retry_status_codes.clone());
            ClientBuilder::new(client)
                .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                    backoff_policy(&self.config),
                    strategy,
                ))
                .build()
        } else {
            ClientBuilder::new(client).build()
        };
        Ok(HttpTransport { client })
    }
}
