//! datalink-core
//!
//! Building blocks shared by the datalink client and its transports.
//!
//! - `codec`: path templating, parameter flattening, GET/POST selection.
//! - `reference`: `DATABASE/CODE` series and `VENDOR/TABLE` references.
//! - `result`, `table`, `cell`: the uniform row/column result model.
//! - `merge`: outer-join of several series on their date axis.
//! - `validate`: 1-based column index checks.
//! - `transport`: the `Transport` trait and response error mapping.
//!
//! Nothing in this crate touches the network; the `Transport` trait is the
//! only seam to it and is implemented in `datalink-http` and `datalink-mock`.
#![warn(missing_docs)]

/// Scalar cell values.
pub mod cell;
pub mod codec;
/// Polars conversion (`dataframe` feature).
#[cfg(feature = "dataframe")]
pub mod dataframe;
pub mod merge;
pub mod metadata;
pub mod params;
pub mod reference;
pub mod result;
pub mod table;
pub mod transport;
pub mod validate;

pub use cell::Cell;
pub use codec::{
    FlatParams, HttpMethod, RequestStyle, constructed_path, encode_query, flatten_params,
    post_body, query_pairs, request_method,
};
pub use datalink_types::{ApiConfig, ApiErrorDetails, DataLinkError, FetchStrategy, Warning};
pub use merge::{MergeInput, merge_series_results};
pub use metadata::{
    ColumnSpec, DatabaseMetadata, DatasetMetadata, DatatableMetadata, ListMeta, ListPage, Metadata,
};
pub use params::{Collapse, Order, Params, Transform};
pub use reference::{SeriesReference, TableReference};
pub use result::{FetchResult, ResultKind};
pub use table::Table;
pub use transport::{
    ApiRequest, ApiResponse, Download, Transport, download_target, error_from_response,
};
pub use validate::{validate_column_indexes, validate_lower_bounds};
