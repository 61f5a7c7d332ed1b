//! Typed metadata carried by series, tables, and catalogue lookups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cell::Cell;

/// Name and declared type of a datatable column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Provider type string, e.g. `Date`, `String`, `BigDecimal(11,4)`.
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Metadata returned next to the rows of a fetch.
///
/// Known keys get named fields; anything else the provider sends is kept in
/// `extra`. Date fields are [`Cell`]s so malformed dates survive as text
/// instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Column names of a series; entries are null for unknown columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<Option<String>>>,
    /// Column descriptors of a datatable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnSpec>>,
    /// First date covered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Cell>,
    /// Last date covered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Cell>,
    /// Native frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Row ordering echoed by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Row limit echoed by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Collapse echoed by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse: Option<String>,
    /// Transform echoed by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    /// Server-side column filter echoed by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_index: Option<i64>,
    /// Cursor of the next datatable page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor_id: Option<String>,
    /// Provider fields without a named slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Start date, when it parsed as a calendar date.
    #[must_use]
    pub fn start(&self) -> Option<NaiveDate> {
        self.start_date.as_ref().and_then(Cell::as_date)
    }

    /// End date, when it parsed as a calendar date.
    #[must_use]
    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date.as_ref().and_then(Cell::as_date)
    }

    /// Column names with nulls rendered as `"None"`.
    #[must_use]
    pub fn column_name_strings(&self) -> Vec<String> {
        self.column_names
            .iter()
            .flatten()
            .map(|c| c.clone().unwrap_or_else(|| "None".to_string()))
            .collect()
    }
}

/// Catalogue entry of a dataset (`datasets/{db}/{ds}/metadata`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMetadata {
    /// Numeric id.
    pub id: Option<i64>,
    /// Database the dataset belongs to.
    pub database_code: String,
    /// Dataset code within its database.
    pub dataset_code: String,
    /// Display name.
    pub name: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Last refresh time.
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Most recent date with data.
    pub newest_available_date: Option<NaiveDate>,
    /// Oldest date with data.
    pub oldest_available_date: Option<NaiveDate>,
    /// Column names, date axis first.
    pub column_names: Vec<String>,
    /// Native frequency.
    pub frequency: Option<String>,
    /// Dataset type, e.g. `Time Series`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Whether a subscription is required.
    pub premium: Option<bool>,
    /// Numeric id of the owning database.
    pub database_id: Option<i64>,
    /// Provider fields without a named slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DatasetMetadata {
    /// `DATABASE/DATASET` code.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}/{}", self.database_code, self.dataset_code)
    }
}

/// Catalogue entry of a database (`databases/{code}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseMetadata {
    /// Numeric id.
    pub id: Option<i64>,
    /// Database code.
    pub database_code: String,
    /// Display name.
    pub name: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Number of datasets.
    pub datasets_count: Option<u64>,
    /// Download counter.
    pub downloads: Option<u64>,
    /// Whether a subscription is required.
    pub premium: Option<bool>,
    /// Logo URL.
    pub image: Option<String>,
    /// Provider fields without a named slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Catalogue entry of a datatable (`datatables/{code}/metadata`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatatableMetadata {
    /// Numeric id.
    pub id: Option<i64>,
    /// Vendor part of the code.
    pub vendor_code: String,
    /// Table part of the code.
    pub datatable_code: String,
    /// Display name.
    pub name: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Column descriptors.
    pub columns: Vec<ColumnSpec>,
    /// Columns accepted as row filters.
    pub filters: Vec<String>,
    /// Columns forming the primary key.
    pub primary_key: Vec<String>,
    /// Whether a subscription is required.
    pub premium: Option<bool>,
    /// Provider fields without a named slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Paging block of the catalogue list endpoints (`databases`, `datasets`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListMeta {
    /// Search query echoed by the service.
    pub query: Option<String>,
    /// Entries per page.
    pub per_page: Option<u64>,
    /// 1-based number of this page.
    pub current_page: u64,
    /// Previous page number, if any.
    pub prev_page: Option<u64>,
    /// Number of pages available.
    pub total_pages: u64,
    /// Number of entries across all pages.
    pub total_count: u64,
    /// Next page number, if any.
    pub next_page: Option<u64>,
    /// 1-based position of the first entry on this page.
    pub current_first_item: Option<u64>,
    /// 1-based position of the last entry on this page.
    pub current_last_item: Option<u64>,
    /// Provider fields without a named slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a catalogue listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPage<T> {
    /// Entries on this page.
    pub items: Vec<T>,
    /// Paging information.
    pub meta: ListMeta,
}

impl<T> ListPage<T> {
    /// True when later pages exist.
    #[must_use]
    pub const fn has_more_results(&self) -> bool {
        self.meta.total_pages > self.meta.current_page
    }

    /// Number of entries on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when this page holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
