use serde_json::{Value, json};

/// Column descriptors of the sample datatable.
#[must_use]
pub fn columns() -> Value {
    json!([
        {"name": "per_end_date", "type": "Date"},
        {"name": "ticker", "type": "String"},
        {"name": "tot_oper_exp", "type": "BigDecimal(11,4)"}
    ])
}

/// One datatable page.
#[must_use]
pub fn page(data: Value, next_cursor_id: Option<&str>) -> Value {
    json!({
        "datatable": {
            "data": data,
            "columns": columns()
        },
        "meta": {
            "next_cursor_id": next_cursor_id
        }
    })
}

/// Page reached with `cursor` (`None` for the first page).
///
/// Three pages chained `c1 -> c2 -> end`, one row each.
#[must_use]
pub fn page_for_cursor(cursor: Option<&str>) -> Option<Value> {
    match cursor {
        None => Some(page(json!([["2015-07-11", "AAPL", 456.9]]), Some("c1"))),
        Some("c1") => Some(page(json!([["2015-07-13", "AAPL", 433.3]]), Some("c2"))),
        Some("c2") => Some(page(json!([["2015-07-14", "MSFT", 419.1]]), None)),
        Some(_) => None,
    }
}
