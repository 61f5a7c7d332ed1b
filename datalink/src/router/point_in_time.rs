use chrono::{NaiveDate, Utc};
use datalink_core::{DataLinkError, FetchResult, Params, TableReference};

use crate::DataLink;
use crate::router::table::PageLimitPolicy;

/// Time window of a point-in-time request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitInterval {
    /// The table as known on a date; today when `None`.
    AsOf(Option<NaiveDate>),
    /// Changes from `start` to `end`.
    From {
        /// First date of the window.
        start: NaiveDate,
        /// Last date of the window.
        end: NaiveDate,
    },
    /// Changes between `start` and `end`.
    Between {
        /// First date of the window.
        start: NaiveDate,
        /// Last date of the window.
        end: NaiveDate,
    },
}

impl PitInterval {
    /// Path segment following `pit/{code}/`.
    #[must_use]
    pub fn path_segment(&self) -> String {
        let ymd = |d: &NaiveDate| d.format("%Y-%m-%d").to_string();
        match self {
            Self::AsOf(date) => {
                let date = date.unwrap_or_else(|| Utc::now().date_naive());
                format!("asofdate/{}", ymd(&date))
            }
            Self::From { start, end } => format!("from/{}/to/{}", ymd(start), ymd(end)),
            Self::Between { start, end } => format!("between/{}/{}", ymd(start), ymd(end)),
        }
    }
}

/// A point-in-time datatable request.
#[derive(Debug, Clone, PartialEq)]
pub struct PitRequest {
    code: String,
    interval: PitInterval,
    params: Params,
    paginate: bool,
}

impl PitRequest {
    /// Request `code` (`VENDOR/TABLE`) over `interval`.
    #[must_use]
    pub fn new(code: impl Into<String>, interval: PitInterval) -> Self {
        Self {
            code: code.into(),
            interval,
            params: Params::new(),
            paginate: false,
        }
    }

    /// Replace the filters and `qopts`.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Follow `next_cursor_id` until the table is exhausted.
    #[must_use]
    pub const fn paginate(mut self, yes: bool) -> Self {
        self.paginate = yes;
        self
    }

    /// Relative request path.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed code.
    pub fn path(&self) -> Result<String, DataLinkError> {
        let reference = TableReference::new(&self.code)?;
        Ok(format!(
            "pit/{}/{}",
            reference.code(),
            self.interval.path_segment()
        ))
    }
}

impl DataLink {
    /// Fetch a point-in-time view of a datatable.
    ///
    /// Behavior and trade-offs:
    /// - Uses the same cursor loop as [`DataLink::get_table`].
    /// - Unlike regular tables, reaching `page_limit` with pages still pending
    ///   is an error (`LimitExceeded`), not a warning. Stopping after the first
    ///   page because pagination was not requested is still a warning.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed code, `LimitExceeded` when the page
    /// limit is hit, or any service error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink::router::point_in_time::point_in_time",
            skip(self, request),
            fields(code = %request.code, interval = ?request.interval),
        )
    )]
    pub async fn point_in_time(&self, request: PitRequest) -> Result<FetchResult, DataLinkError> {
        let path = request.path()?;
        let (client, params, warnings) = self.scoped(request.params);
        let result = client
            .paginate(
                &path,
                &request.code,
                &params,
                request.paginate,
                PageLimitPolicy::Fail,
            )
            .await?;
        Ok(result.with_warnings(warnings))
    }
}
