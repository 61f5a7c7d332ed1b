//! Retry policy translation for the middleware stack.

use std::time::Duration;

use datalink_core::ApiConfig;
use reqwest_middleware::Error as MiddlewareError;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{Retryable, RetryableStrategy, default_on_request_failure};

/// Retries exactly the configured statuses plus connection-level failures.
#[derive(Debug, Clone)]
pub struct StatusRetryStrategy {
    statuses: Vec<u16>,
}

impl StatusRetryStrategy {
    /// Strategy retrying `statuses`.
    #[must_use]
    pub const fn new(statuses: Vec<u16>) -> Self {
        Self { statuses }
    }

    /// Whether `status` is retried.
    #[must_use]
    pub fn retries(&self, status: u16) -> bool {
        self.statuses.contains(&status)
    }
}

impl RetryableStrategy for StatusRetryStrategy {
    fn handle(&self, res: &Result<reqwest::Response, MiddlewareError>) -> Option<Retryable> {
        match res {
            Ok(response) if self.retries(response.status().as_u16()) => Some(Retryable::Transient),
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}

/// Exponential backoff starting at `retry_backoff_factor` seconds, capped at
/// `max_wait_between_retries`.
#[must_use]
pub fn backoff_policy(config: &ApiConfig) -> ExponentialBackoff {
    let retry = &config.retry;
    let max = retry.max_wait_between_retries;
    let min = Duration::try_from_secs_f64(retry.retry_backoff_factor)
        .unwrap_or(Duration::ZERO)
        .min(max);
    ExponentialBackoff::builder()
        .retry_bounds(min, max)
        .build_with_max_retries(retry.number_of_retries)
}
