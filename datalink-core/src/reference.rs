//! Logical references to series and tables.

use core::fmt;
use core::str::FromStr;

use datalink_types::DataLinkError;
use serde::{Deserialize, Serialize};

use crate::validate::validate_lower_bounds;

fn split_code(code: &str, what: &str) -> Result<(String, String), DataLinkError> {
    match code.split_once('/') {
        Some((a, b)) if !a.is_empty() && !b.is_empty() => Ok((a.to_string(), b.to_string())),
        _ => Err(DataLinkError::invalid_arg(format!(
            "{what} code must look like DATABASE/CODE, got '{code}'"
        ))),
    }
}

/// A time series identified by `DATABASE/CODE`, optionally restricted to
/// a subset of its 1-based value columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesReference {
    database_code: String,
    dataset_code: String,
    columns: Vec<i64>,
}

impl SeriesReference {
    /// Reference to every column of `code`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `code` is not of the form `DATABASE/CODE`.
    pub fn new(code: &str) -> Result<Self, DataLinkError> {
        let (database_code, dataset_code) = split_code(code, "dataset")?;
        Ok(Self {
            database_code,
            dataset_code,
            columns: Vec::new(),
        })
    }

    /// Parse `DATABASE/CODE` or `DATABASE/CODE.N`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed code or a non-numeric suffix.
    pub fn parse(s: &str) -> Result<Self, DataLinkError> {
        let Some((code, suffix)) = s.split_once('.') else {
            return Self::new(s);
        };
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DataLinkError::invalid_arg(format!(
                "the column index must be an integer, got '{s}'"
            )));
        }
        let index = suffix
            .parse::<i64>()
            .map_err(|e| DataLinkError::invalid_arg(format!("{s}: {e}")))?;
        Ok(Self::new(code)?.with_columns([index]))
    }

    /// Restrict the reference to the given 1-based columns, in that order.
    #[must_use]
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = i64>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    /// `DATABASE/CODE`.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}/{}", self.database_code, self.dataset_code)
    }

    /// Database part of the code.
    #[must_use]
    pub fn database_code(&self) -> &str {
        &self.database_code
    }

    /// Dataset part of the code.
    #[must_use]
    pub fn dataset_code(&self) -> &str {
        &self.dataset_code
    }

    /// Requested 1-based columns; empty means all.
    #[must_use]
    pub fn columns(&self) -> &[i64] {
        &self.columns
    }

    /// Reject indexes below 1 before any request is made.
    ///
    /// # Errors
    /// Returns `ColumnIndexOutOfRange` for the first index below 1.
    pub fn check_lower_bounds(&self) -> Result<(), DataLinkError> {
        validate_lower_bounds(&self.columns, &self.code())
    }
}

impl fmt::Display for SeriesReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database_code, self.dataset_code)
    }
}

impl FromStr for SeriesReference {
    type Err = DataLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A datatable identified by `VENDOR/TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableReference {
    vendor_code: String,
    table_code: String,
}

impl TableReference {
    /// Parse `VENDOR/TABLE`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `code` has no `/` separator.
    pub fn new(code: &str) -> Result<Self, DataLinkError> {
        let (vendor_code, table_code) = split_code(code, "datatable")?;
        Ok(Self {
            vendor_code,
            table_code,
        })
    }

    /// `VENDOR/TABLE`.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}/{}", self.vendor_code, self.table_code)
    }

    /// Vendor part of the code.
    #[must_use]
    pub fn vendor_code(&self) -> &str {
        &self.vendor_code
    }

    /// Table part of the code.
    #[must_use]
    pub fn table_code(&self) -> &str {
        &self.table_code
    }
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor_code, self.table_code)
    }
}

impl FromStr for TableReference {
    type Err = DataLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
