//! Non-fatal conditions reported alongside partial results.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A soft condition that did not abort the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Warning {
    /// The paginator stopped after `pages` pages because `limit` was reached.
    PageLimitReached {
        /// Table code being paginated.
        code: String,
        /// Pages fetched before stopping.
        pages: usize,
        /// Configured page limit.
        limit: usize,
    },
    /// More pages exist but pagination was not requested.
    MorePagesAvailable {
        /// Table code being fetched.
        code: String,
        /// Cursor that would fetch the next page.
        next_cursor_id: String,
    },
    /// A legacy parameter name was translated to its current name.
    DeprecatedParam {
        /// Name supplied by the caller.
        old: String,
        /// Name sent to the service.
        new: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageLimitReached { code, pages, limit } => write!(
                f,
                "{code}: stopped after {pages} pages (page limit {limit}); use a bulk export to download the full table"
            ),
            Self::MorePagesAvailable { code, .. } => write!(
                f,
                "{code}: more pages are available; enable pagination to request them"
            ),
            Self::DeprecatedParam { old, new } => {
                write!(f, "{old} will no longer be supported. Please use {new} instead")
            }
        }
    }
}
