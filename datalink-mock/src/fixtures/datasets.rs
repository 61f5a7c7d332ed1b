use serde_json::{Value, json};

/// Column names of the sample series.
pub const SAMPLE_COLUMNS: [&str; 4] = ["Date", "column.1", "column.2", "column.3"];

/// `{"dataset_data": {...}}` with the given columns and rows.
#[must_use]
pub fn dataset_data(columns: &[&str], data: Value) -> Value {
    json!({
        "dataset_data": {
            "limit": null,
            "transform": null,
            "column_index": null,
            "column_names": columns,
            "start_date": "2014-02-01",
            "end_date": "2015-07-29",
            "frequency": "daily",
            "data": data,
            "collapse": null,
            "order": "asc"
        }
    })
}

/// Four daily rows over three value columns.
#[must_use]
pub fn sample() -> Value {
    dataset_data(
        &SAMPLE_COLUMNS,
        json!([
            ["2015-07-11", 444.3, 10, 3],
            ["2015-07-13", 433.3, 4, 3],
            ["2015-07-14", 437.5, 3, 3],
            ["2015-07-15", 440.0, 2, 3]
        ]),
    )
}

/// `NSE/OIL` filtered to its first column, one row.
#[must_use]
pub fn oil() -> Value {
    dataset_data(&["Date", "column.1"], json!([["2015-07-11", 444.3]]))
}

/// Second sample series overlapping [`sample`] on one date.
#[must_use]
pub fn sample_shifted() -> Value {
    dataset_data(
        &SAMPLE_COLUMNS,
        json!([
            ["2015-07-15", 1.0, 2, 3],
            ["2015-07-16", 1.5, 2, 3]
        ]),
    )
}

/// Reply to a `column_index` filter naming a column the series lacks.
#[must_use]
pub fn missing_column() -> Value {
    let mut v = dataset_data(&["Date", ""], json!([]));
    v["dataset_data"]["column_names"] = json!(["Date", null]);
    v["dataset_data"]["column_index"] = json!(9);
    v
}

/// A row with fewer cells than there are columns.
#[must_use]
pub fn ragged() -> Value {
    dataset_data(
        &SAMPLE_COLUMNS,
        json!([["2015-07-11", 444.3, 10, 3], ["2015-07-13", 433.3]]),
    )
}
