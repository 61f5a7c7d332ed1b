//! Outer-join merge of independently fetched series.

use datalink_types::DataLinkError;

use crate::cell::Cell;
use crate::metadata::Metadata;
use crate::params::{Order, Params};
use crate::reference::SeriesReference;
use crate::result::{FetchResult, ResultKind};
use crate::table::Table;

/// Key axis name used when no input carries one.
pub const DEFAULT_INDEX_NAME: &str = "Date";

/// One fetched series ready to be merged.
#[derive(Debug, Clone)]
pub struct MergeInput {
    /// Series the rows belong to; used to prefix column names.
    pub reference: SeriesReference,
    /// Fetched rows, or the not-found placeholder.
    pub result: FetchResult,
    /// 1-based value columns to keep locally; empty keeps all.
    pub local_columns: Vec<i64>,
}

impl MergeInput {
    /// Input that keeps every fetched column.
    #[must_use]
    pub const fn new(reference: SeriesReference, result: FetchResult) -> Self {
        Self {
            reference,
            result,
            local_columns: Vec::new(),
        }
    }

    /// Restrict to the given 1-based value columns after fetching.
    #[must_use]
    pub fn keep(mut self, columns: impl IntoIterator<Item = i64>) -> Self {
        self.local_columns = columns.into_iter().collect();
        self
    }
}

/// Merge series into one table keyed by date.
///
/// - Locally selected columns are validated against each series' own width.
///   With `tolerate_missing_columns` an out-of-range selection turns that
///   series into a single `"<code> - Not Found"` column of nulls; otherwise
///   the whole merge fails.
/// - Value columns are renamed `"<code> - <column>"`; a name seen twice keeps
///   the first column.
/// - Rows are the union of all keys, ascending, reversed when `request`
///   asked for `order=desc`. A key repeated within one series keeps only its
///   first row.
/// - Metadata is copied from the first real series. `start_date` and
///   `end_date` keep the echoed request value when `request` set them,
///   otherwise they span the inputs.
///
/// # Errors
/// Returns `ColumnIndexOutOfRange` for an invalid local selection when not
/// tolerated, or `InvalidData` if an input is malformed.
pub fn merge_series_results(
    inputs: Vec<MergeInput>,
    request: &Params,
    tolerate_missing_columns: bool,
) -> Result<FetchResult, DataLinkError> {
    let mut first_meta: Option<Metadata> = None;
    let mut index_name: Option<String> = None;
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    let mut warnings = Vec::new();
    let mut tables = Vec::with_capacity(inputs.len());

    for input in inputs {
        let code = input.reference.code();
        let (result, local) = (input.result, input.local_columns);
        let sentinel = result.is_not_found();
        if !sentinel {
            if index_name.is_none() {
                index_name = result.columns().first().cloned();
            }
            if first_meta.is_none() {
                first_meta = Some(result.meta().clone());
            }
            starts.extend(result.meta().start());
            ends.extend(result.meta().end());
        }
        warnings.extend(result.warnings().iter().cloned());

        let selection: &[i64] = if sentinel { &[] } else { &local };
        let table = match result.to_table().keep_columns(selection, &code) {
            Ok(t) => t,
            Err(e) if tolerate_missing_columns && e.is_column_not_found() => {
                FetchResult::not_found().to_table()
            }
            Err(e) => return Err(e),
        };
        tables.push(table.rename_columns(|c| format!("{code} - {c}")));
    }

    let index_name = index_name.unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string());
    let mut merged = Table::outer_join(tables, &index_name)?.dedup_columns();
    let descending = request.order() == Some(Order::Desc);
    if descending {
        merged = merged.reversed();
    }

    let mut meta = first_meta.unwrap_or_default();
    let mut column_names = vec![index_name.clone()];
    column_names.extend(merged.columns().iter().cloned());
    meta.column_names = Some(column_names.iter().cloned().map(Some).collect());
    meta.column_index = None;

    let key_dates = || merged.index().iter().filter_map(Cell::as_date);
    if !request.contains_key("start_date") {
        meta.start_date = starts
            .into_iter()
            .min()
            .or_else(|| key_dates().min())
            .map(Cell::Date);
    }
    if !request.contains_key("end_date") {
        meta.end_date = ends
            .into_iter()
            .max()
            .or_else(|| key_dates().max())
            .map(Cell::Date);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rows = merged.len(),
        columns = merged.columns().len(),
        descending,
        "merged series"
    );
    let rows = merged.to_flat_list();
    Ok(FetchResult::new(column_names, rows, meta, ResultKind::Merged)?.with_warnings(warnings))
}
