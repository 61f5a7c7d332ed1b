//! Conversion of result tables into polars data frames.

use chrono::{DateTime, Utc};
use datalink_types::DataLinkError;
use polars::prelude::*;

use crate::cell::Cell;
use crate::table::Table;

fn polars_err(e: PolarsError) -> DataLinkError {
    DataLinkError::invalid_data(format!("dataframe: {e}"))
}

fn to_column<'a, I>(name: &str, cells: I) -> Result<Column, DataLinkError>
where
    I: Iterator<Item = &'a Cell> + Clone,
{
    let all = |pred: fn(&Cell) -> bool| cells.clone().filter(|c| !c.is_null()).all(pred);
    let first = cells.clone().find(|c| !c.is_null());
    let column = match first {
        Some(Cell::Int(_) | Cell::Float(_))
            if all(|c| matches!(c, Cell::Int(_) | Cell::Float(_))) =>
        {
            let v: Vec<Option<f64>> = cells.map(Cell::as_f64).collect();
            Column::new(name.into(), v)
        }
        Some(Cell::Bool(_)) if all(|c| matches!(c, Cell::Bool(_))) => {
            let v: Vec<Option<bool>> = cells
                .map(|c| match c {
                    Cell::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), v)
        }
        Some(Cell::Date(_)) if all(|c| matches!(c, Cell::Date(_))) => {
            let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
            let v: Vec<Option<i32>> = cells
                .map(|c| {
                    c.as_date()
                        .and_then(|d| i32::try_from(d.signed_duration_since(epoch).num_days()).ok())
                })
                .collect();
            Column::new(name.into(), v)
                .cast(&DataType::Date)
                .map_err(polars_err)?
        }
        Some(Cell::DateTime(_)) if all(|c| matches!(c, Cell::DateTime(_))) => {
            let v: Vec<Option<i64>> = cells
                .map(|c| match c {
                    Cell::DateTime(dt) => Some(dt.timestamp_millis()),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), v)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
                .map_err(polars_err)?
        }
        _ => {
            let v: Vec<Option<String>> = cells
                .map(|c| if c.is_null() { None } else { Some(c.to_string()) })
                .collect();
            Column::new(name.into(), v)
        }
    };
    Ok(column)
}

/// Build a data frame with the key axis, when present, as the first column.
///
/// Each column is typed from its non-null cells: numbers become `f64`,
/// dates become `Date`, timestamps become millisecond `Datetime`, and
/// anything mixed falls back to strings.
///
/// # Errors
/// Returns `InvalidData` if polars rejects the columns.
pub fn to_dataframe(table: &Table) -> Result<DataFrame, DataLinkError> {
    let mut columns = Vec::with_capacity(table.columns().len() + 1);
    if let Some(name) = table.index_name() {
        columns.push(to_column(name, table.index().iter())?);
    }
    for (i, name) in table.columns().iter().enumerate() {
        columns.push(to_column(name, table.rows().iter().map(move |r| &r[i]))?);
    }
    DataFrame::new(columns).map_err(polars_err)
}
