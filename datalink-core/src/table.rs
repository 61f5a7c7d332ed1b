//! Column-oriented view of a result with an optional key axis.

use std::collections::{BTreeMap, BTreeSet};

use datalink_types::DataLinkError;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::validate::validate_column_indexes;

/// Rows of named columns, optionally keyed by an index axis.
///
/// Series and merged results are keyed by their date column; datatables have
/// no implicit key. Every row holds exactly one cell per entry of `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index_name: Option<String>,
    index: Vec<Cell>,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Table without a key axis.
    ///
    /// # Errors
    /// Returns `InvalidData` if a row width differs from `columns.len()`.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, DataLinkError> {
        check_widths(columns.len(), &rows)?;
        Ok(Self {
            index_name: None,
            index: Vec::new(),
            columns,
            rows,
        })
    }

    /// Table keyed by `index`, one key per row.
    ///
    /// # Errors
    /// Returns `InvalidData` if the key count or a row width does not match.
    pub fn indexed(
        index_name: impl Into<String>,
        index: Vec<Cell>,
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, DataLinkError> {
        check_widths(columns.len(), &rows)?;
        if index.len() != rows.len() {
            return Err(DataLinkError::invalid_data(format!(
                "index has {} keys for {} rows",
                index.len(),
                rows.len()
            )));
        }
        Ok(Self {
            index_name: Some(index_name.into()),
            index,
            columns,
            rows,
        })
    }

    // Callers guarantee widths already match.
    pub(crate) fn from_parts(
        index_name: Option<String>,
        index: Vec<Cell>,
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        Self {
            index_name,
            index,
            columns,
            rows,
        }
    }

    /// Name of the key axis, if any.
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Keys, one per row; empty for unkeyed tables.
    #[must_use]
    pub fn index(&self) -> &[Cell] {
        &self.index
    }

    /// Value column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
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

    /// Cells of the column called `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let pos = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| &r[pos]).collect())
    }

    /// Rows with the key, when present, prepended.
    #[must_use]
    pub fn to_flat_list(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut out = Vec::with_capacity(row.len() + 1);
                if let Some(key) = self.index.get(i) {
                    out.push(key.clone());
                }
                out.extend(row.iter().cloned());
                out
            })
            .collect()
    }

    /// Keep only the given 1-based value columns, in the given order.
    ///
    /// An empty selection keeps every column.
    ///
    /// # Errors
    /// Returns `ColumnIndexOutOfRange` for an index outside `[1, columns.len()]`.
    pub fn keep_columns(self, indexes: &[i64], context: &str) -> Result<Self, DataLinkError> {
        if indexes.is_empty() {
            return Ok(self);
        }
        validate_column_indexes(indexes, self.columns.len(), context)?;
        let picks: Vec<usize> = indexes
            .iter()
            .filter_map(|&i| usize::try_from(i - 1).ok())
            .collect();
        let columns = picks.iter().map(|&p| self.columns[p].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| picks.iter().map(|&p| row[p].clone()).collect())
            .collect();
        Ok(Self {
            index_name: self.index_name,
            index: self.index,
            columns,
            rows,
        })
    }

    /// Rename every value column through `f`.
    #[must_use]
    pub fn rename_columns(mut self, f: impl Fn(&str) -> String) -> Self {
        self.columns = self.columns.iter().map(|c| f(c)).collect();
        self
    }

    /// Drop columns whose name was already seen, keeping the first.
    #[must_use]
    pub fn dedup_columns(self) -> Self {
        let mut seen = BTreeSet::new();
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| seen.insert(name.as_str()))
            .map(|(i, _)| i)
            .collect();
        if keep.len() == self.columns.len() {
            return self;
        }
        let columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Self {
            index_name: self.index_name,
            index: self.index,
            columns,
            rows,
        }
    }

    /// Reverse the row order.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.index.reverse();
        self.rows.reverse();
        self
    }

    /// Outer-join keyed tables on their key axis.
    ///
    /// The result holds the union of keys in ascending order and the columns
    /// of every input, in input order; cells a table has no row for are
    /// null. Within one input a repeated key keeps its first row. The joined
    /// key axis is called `index_name`.
    ///
    /// # Errors
    /// Returns `InvalidData` if an input has no key axis.
    pub fn outer_join(
        tables: impl IntoIterator<Item = Self>,
        index_name: &str,
    ) -> Result<Self, DataLinkError> {
        let mut columns: Vec<String> = Vec::new();
        let mut joined: BTreeMap<Cell, Vec<Cell>> = BTreeMap::new();

        for table in tables {
            if table.index_name.is_none() {
                return Err(DataLinkError::invalid_data(
                    "cannot join a table without a key axis",
                ));
            }
            let offset = columns.len();
            let width = offset + table.columns.len();
            columns.extend(table.columns);
            for row in joined.values_mut() {
                row.resize(width, Cell::Null);
            }
            let mut seen = BTreeSet::new();
            for (key, values) in table.index.into_iter().zip(table.rows) {
                if !seen.insert(key.clone()) {
                    continue;
                }
                let row = joined
                    .entry(key)
                    .or_insert_with(|| vec![Cell::Null; width]);
                for (slot, v) in row[offset..].iter_mut().zip(values) {
                    *slot = v;
                }
            }
        }

        let (index, rows) = joined.into_iter().unzip();
        Ok(Self {
            index_name: Some(index_name.to_string()),
            index,
            columns,
            rows,
        })
    }

    /// Serialise as CSV with a header row; the key, when present, comes first.
    ///
    /// # Errors
    /// Returns `InvalidData` if the CSV writer fails.
    pub fn to_csv(&self) -> Result<String, DataLinkError> {
        let csv_err = |e: csv::Error| DataLinkError::invalid_data(format!("csv: {e}"));
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let header = self.index_name.iter().chain(self.columns.iter());
        wtr.write_record(header).map_err(csv_err)?;
        for row in self.to_flat_list() {
            wtr.write_record(row.iter().map(ToString::to_string))
                .map_err(csv_err)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| DataLinkError::invalid_data(format!("csv: {e}")))?;
        String::from_utf8(bytes).map_err(|e| DataLinkError::invalid_data(format!("csv: {e}")))
    }
}

pub(crate) fn check_widths(width: usize, rows: &[Vec<Cell>]) -> Result<(), DataLinkError> {
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(DataLinkError::invalid_data(format!(
            "row {i} has {} values but there are {width} columns",
            row.len()
        )));
    }
    Ok(())
}
