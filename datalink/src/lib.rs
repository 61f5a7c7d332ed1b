//! Async client for the Nasdaq Data Link time-series API.
//!
//! Overview
//! - [`DataLink::get`] fetches one series, or several series outer-joined on
//!   their date axis with provenance-prefixed column names.
//! - [`DataLink::get_table`] reads cursor-paginated datatables;
//!   [`DataLink::point_in_time`] reads their point-in-time variants.
//! - Metadata lookups and bulk-download URLs for datasets, databases and
//!   datatables.
//! - Every call returns a [`FetchResult`]: column names, rows of [`Cell`]s,
//!   typed [`Metadata`], and any soft [`Warning`]s.
//!
//! Key behaviors and trade-offs
//! - Requests go through a [`Transport`]. The default is the `reqwest`-based
//!   transport from `datalink-http` (feature `http`), which owns timeouts and
//!   retries; tests plug in `datalink-mock`.
//! - Merges fetch series sequentially by default. `FetchStrategy::Concurrent`
//!   issues them at once; output column order follows the input either way.
//! - Pagination stops at `page_limit` pages with a warning for datatables and
//!   an error for point-in-time tables.
//! - Legacy option names (`trim_start`, `sort_order`, ...) are translated with a
//!   `DeprecatedParam` warning; an `api_key` option becomes a per-call
//!   credential instead of a query parameter.
//!
//! Examples
//! Building a client and merging two series:
//! ```rust,ignore
//! use datalink::{DataLink, Params, Selector};
//!
//! let client = DataLink::builder().from_env().build()?;
//! let merged = client
//!     .get(Selector::parse_many(&["WIKI/AAPL.4", "WIKI/MSFT.4"])?, Params::new())
//!     .await?;
//! println!("{}", merged.to_csv()?);
//! ```
//!
//! Reading every page of a datatable:
//! ```rust,ignore
//! use serde_json::json;
//!
//! let fc = client
//!     .table("ZACKS/FC")
//!     .params(Params::new().with("ticker", json!(["AAPL", "MSFT"])))
//!     .paginate(true)
//!     .run()
//!     .await?;
//! for w in fc.warnings() {
//!     eprintln!("{w}");
//! }
//! ```
#![warn(missing_docs)]

mod client;
pub mod credentials;
pub mod global;
pub mod params;
mod router;

pub use client::{DataLink, DataLinkBuilder, REQUEST_SOURCE};
pub use router::dataset::{FetchFlags, Selector};
pub use router::point_in_time::{PitInterval, PitRequest};
pub use router::table::{TableBuilder, TableRequest};

pub use datalink_core::{
    ApiRequest, ApiResponse, Cell, Collapse, ColumnSpec, DatabaseMetadata, DatasetMetadata,
    DatatableMetadata, Download, FetchResult, HttpMethod, ListMeta, ListPage, Metadata, Order,
    Params, ResultKind, SeriesReference, Table, TableReference, Transform, Transport,
};
pub use datalink_types::{
    ApiConfig, ApiErrorDetails, DataLinkError, FetchStrategy, RetryConfig, Warning,
};
