use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic payload attached to every error raised from an API response.
///
/// Mirrors what the remote service tells us about a failure: the message, the
/// HTTP status, the raw body, and the provider error code (e.g. `QECx02`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiErrorDetails {
    /// Human-readable message, either from the server or generated locally.
    pub message: String,
    /// HTTP status code of the response, when the error came from one.
    pub http_status: Option<u16>,
    /// Raw response body, kept for diagnostics.
    pub http_body: Option<String>,
    /// Provider-specific error code string.
    pub code: Option<String>,
}

impl ApiErrorDetails {
    /// Message used when the service did not supply one.
    pub const GENERIC_MESSAGE: &'static str = "Something went wrong. Please try again. \
If you continue to have problems, please contact us at connect@data.nasdaq.com.";

    /// Details carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.is_empty() {
                Self::GENERIC_MESSAGE.to_string()
            } else {
                message
            },
            ..Self::default()
        }
    }

    /// Attach the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Attach the raw response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.http_body = Some(body.into());
        self
    }

    /// Attach the provider error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.http_status {
            write!(f, "(Status {status}) ")?;
        }
        if let Some(code) = &self.code {
            write!(f, "(Nasdaq Data Link Error {code}) ")?;
        }
        f.write_str(&self.message)
    }
}

/// Unified error type for the datalink workspace.
///
/// The first group of variants is the service taxonomy: each carries the
/// [`ApiErrorDetails`] of the response that produced it. The remaining
/// variants are raised locally (argument validation, column range checks,
/// transport and decoding failures).
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataLinkError {
    /// The API key is missing or was rejected.
    #[error("authentication error: {0}")]
    Authentication(ApiErrorDetails),

    /// The request was malformed or carried invalid parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(ApiErrorDetails),

    /// A rate or volume limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(ApiErrorDetails),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(ApiErrorDetails),

    /// The service is temporarily unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(ApiErrorDetails),

    /// The service failed internally.
    #[error("internal server error: {0}")]
    InternalServer(ApiErrorDetails),

    /// The API key does not grant access to the resource.
    #[error("forbidden: {0}")]
    Forbidden(ApiErrorDetails),

    /// The payload is inconsistent (e.g. row width differs from column count).
    #[error("invalid data: {0}")]
    InvalidData(ApiErrorDetails),

    /// A requested column does not exist in the series.
    #[error("column not found: {0}")]
    ColumnNotFound(ApiErrorDetails),

    /// An API error whose code did not map to a known kind.
    #[error("api error: {0}")]
    Api(ApiErrorDetails),

    /// A 1-based column index fell outside `[1, max]`.
    #[error("{context}: requested index {index} is out of range. {}", range_hint(.max))]
    ColumnIndexOutOfRange {
        /// Series or table the indexes were validated against.
        context: String,
        /// Offending index.
        index: i64,
        /// Largest valid index; `None` when only the lower bound was checked.
        max: Option<usize>,
    },

    /// Invalid input argument (bad code format, non-numeric column suffix, ...).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl DataLinkError {
    /// Map a provider error code such as `QECx02` to its taxonomy kind.
    ///
    /// The second character of the code selects the kind; unknown or
    /// malformed codes map to [`DataLinkError::Api`].
    #[must_use]
    pub fn from_error_code(code: &str, details: ApiErrorDetails) -> Self {
        let letter = code
            .strip_prefix("QE")
            .and_then(|rest| {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(l), Some('x')) if l.is_ascii_alphabetic() => Some(l),
                    _ => None,
                }
            });
        match letter {
            Some('L') => Self::LimitExceeded(details),
            Some('M') => Self::InternalServer(details),
            Some('A') => Self::Authentication(details),
            Some('P') => Self::Forbidden(details),
            Some('S') => Self::InvalidRequest(details),
            Some('C') => Self::NotFound(details),
            Some('X') => Self::ServiceUnavailable(details),
            _ => Self::Api(details),
        }
    }

    /// Helper: build a `NotFound` error from a message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(ApiErrorDetails::new(message))
    }

    /// Helper: build an `InvalidData` error from a message.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(ApiErrorDetails::new(message))
    }

    /// Helper: build a `ColumnNotFound` error from a message.
    pub fn column_not_found(message: impl Into<String>) -> Self {
        Self::ColumnNotFound(ApiErrorDetails::new(message))
    }

    /// Helper: build a `LimitExceeded` error from a message.
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::LimitExceeded(ApiErrorDetails::new(message))
    }

    /// Helper: build an `InvalidRequest` error from a message.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(ApiErrorDetails::new(message))
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(message: impl Into<String>) -> Self {
        Self::InvalidArg(message.into())
    }

    /// Response details, when the error carries them.
    #[must_use]
    pub const fn details(&self) -> Option<&ApiErrorDetails> {
        match self {
            Self::Authentication(d)
            | Self::InvalidRequest(d)
            | Self::LimitExceeded(d)
            | Self::NotFound(d)
            | Self::ServiceUnavailable(d)
            | Self::InternalServer(d)
            | Self::Forbidden(d)
            | Self::InvalidData(d)
            | Self::ColumnNotFound(d)
            | Self::Api(d) => Some(d),
            Self::ColumnIndexOutOfRange { .. }
            | Self::InvalidArg(_)
            | Self::Transport(_)
            | Self::Decode(_) => None,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        self.details().and_then(|d| d.http_status)
    }

    /// True for the "resource does not exist" kind.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for both server-reported missing columns and local range failures.
    #[must_use]
    pub const fn is_column_not_found(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound(_) | Self::ColumnIndexOutOfRange { .. }
        )
    }
}

fn range_hint(max: &Option<usize>) -> String {
    match max {
        Some(max) => format!("Min index is 1 and max index is {max}"),
        None => "Min index is 1".to_string(),
    }
}

impl From<serde_json::Error> for DataLinkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
