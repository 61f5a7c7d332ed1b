use serde_json::{Value, json};

use super::datasets::SAMPLE_COLUMNS;

/// `{"dataset": {...}}` catalogue entry.
#[must_use]
pub fn dataset(database_code: &str, dataset_code: &str) -> Value {
    json!({
        "dataset": {
            "id": 7,
            "database_id": 3,
            "database_code": database_code,
            "dataset_code": dataset_code,
            "name": "National Stock Exchange of India",
            "description": "Stock and index data from the National Stock Exchange of India.",
            "frequency": "daily",
            "column_names": SAMPLE_COLUMNS,
            "type": "Time Series",
            "premium": false,
            "refreshed_at": "2015-07-24T02:39:40.624Z",
            "newest_available_date": "2015-07-23",
            "oldest_available_date": "2014-01-01"
        }
    })
}

/// `{"database": {...}}` catalogue entry.
#[must_use]
pub fn database(code: &str) -> Value {
    json!({
        "database": {
            "id": 3,
            "database_code": code,
            "name": "National Stock Exchange of India",
            "description": "Stock and index data from the National Stock Exchange of India.",
            "datasets_count": 1877,
            "downloads": 1_800_463,
            "premium": false,
            "image": "https://s3.amazonaws.com/thumb_nse.png"
        }
    })
}

/// `{"datatable": {...}}` catalogue entry.
#[must_use]
pub fn datatable(vendor_code: &str, datatable_code: &str) -> Value {
    json!({
        "datatable": {
            "vendor_code": vendor_code,
            "datatable_code": datatable_code,
            "name": "Zacks Fundamentals Condensed",
            "columns": super::datatables::columns(),
            "filters": ["ticker", "per_end_date"],
            "primary_key": ["ticker", "per_end_date"],
            "premium": true,
            "status": {"refreshed_at": "2024-05-01T22:02:01.000Z", "status": "ON TIME"}
        }
    })
}
