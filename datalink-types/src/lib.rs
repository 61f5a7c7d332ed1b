//! Datalink error taxonomy, configuration and warning types.
#![warn(missing_docs)]

mod config;
mod error;
mod warning;

pub use config::{
    API_KEY_ENV, ApiConfig, BASE_DOMAIN_ENV, DEFAULT_API_BASE, FetchStrategy, RetryConfig,
};
pub use error::{ApiErrorDetails, DataLinkError};
pub use warning::Warning;
