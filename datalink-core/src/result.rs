//! Uniform result of every fetch.

use datalink_types::{DataLinkError, Warning};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cell::Cell;
use crate::metadata::Metadata;
use crate::table::{Table, check_widths};

/// Column names of the placeholder returned for a tolerated missing series.
pub const NOT_FOUND_COLUMNS: [&str; 2] = ["None", "Not Found"];

/// What produced a [`FetchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    /// One time series; the first column is the date axis.
    Series,
    /// A datatable or point-in-time table; no implicit key.
    Table,
    /// Several series outer-joined on their date axis.
    Merged,
}

/// Rows, column names, metadata, and any soft warnings of one fetch.
///
/// Every row has exactly one cell per column; this is checked on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    meta: Metadata,
    kind: ResultKind,
    warnings: Vec<Warning>,
}

impl FetchResult {
    /// Build a result, validating row widths.
    ///
    /// # Errors
    /// Returns `InvalidData` if any row width differs from `columns.len()`.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
        meta: Metadata,
        kind: ResultKind,
    ) -> Result<Self, DataLinkError> {
        check_widths(columns.len(), &rows)?;
        Ok(Self {
            columns,
            rows,
            meta,
            kind,
            warnings: Vec::new(),
        })
    }

    /// Build a result from raw JSON rows, converting each value into a [`Cell`].
    ///
    /// # Errors
    /// Returns `InvalidData` if a row is not an array or has the wrong width.
    pub fn from_json_rows(
        columns: Vec<String>,
        data: &[Value],
        meta: Metadata,
        kind: ResultKind,
    ) -> Result<Self, DataLinkError> {
        let rows = data
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.as_array()
                    .map(|cells| cells.iter().map(Cell::from_json).collect())
                    .ok_or_else(|| DataLinkError::invalid_data(format!("row {i} is not an array")))
            })
            .collect::<Result<Vec<Vec<Cell>>, _>>()?;
        Self::new(columns, rows, meta, kind)
    }

    /// Empty placeholder for a series that does not exist.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            columns: NOT_FOUND_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
            meta: Metadata::default(),
            kind: ResultKind::Series,
            warnings: Vec::new(),
        }
    }

    /// True for the placeholder built by [`FetchResult::not_found`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.rows.is_empty() && self.columns == NOT_FOUND_COLUMNS
    }

    /// Attach warnings.
    #[must_use]
    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = Warning>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Column names; for series the date axis comes first.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in service order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Metadata returned with the rows.
    #[must_use]
    pub const fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Origin of the result.
    #[must_use]
    pub const fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Soft conditions raised while producing the result.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split into columns, rows, metadata, and warnings.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>, Metadata, Vec<Warning>) {
        (self.columns, self.rows, self.meta, self.warnings)
    }

    /// Tabular view. Series and merged results are keyed by their first
    /// column; datatables are not keyed.
    #[must_use]
    pub fn to_table(&self) -> Table {
        match (self.kind, self.columns.split_first()) {
            (ResultKind::Series | ResultKind::Merged, Some((key, rest))) => {
                let (index, rows) = self
                    .rows
                    .iter()
                    .map(|row| {
                        let mut cells = row.iter().cloned();
                        let key = cells.next().unwrap_or(Cell::Null);
                        (key, cells.collect::<Vec<_>>())
                    })
                    .unzip();
                Table::from_parts(Some(key.clone()), index, rest.to_vec(), rows)
            }
            _ => Table::from_parts(None, Vec::new(), self.columns.clone(), self.rows.clone()),
        }
    }

    /// Rows as plain lists, key first.
    #[must_use]
    pub fn to_flat_list(&self) -> Vec<Vec<Cell>> {
        self.rows.clone()
    }

    /// CSV rendering of [`FetchResult::to_table`].
    ///
    /// # Errors
    /// Returns `InvalidData` if the CSV writer fails.
    pub fn to_csv(&self) -> Result<String, DataLinkError> {
        self.to_table().to_csv()
    }

    /// Tabular view restricted to the given 1-based value columns.
    ///
    /// # Errors
    /// Returns `ColumnIndexOutOfRange` for an index outside the value columns.
    pub fn keep_columns(&self, indexes: &[i64]) -> Result<Table, DataLinkError> {
        let context = self
            .columns
            .first()
            .map_or_else(|| "result".to_string(), |c| format!("result keyed by {c}"));
        self.to_table().keep_columns(indexes, &context)
    }
}
