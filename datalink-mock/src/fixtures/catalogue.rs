//! Catalogue listings (`databases`, `datasets`) and bulk archives.

use serde_json::{Value, json};

/// Databases served by the listing, two per page.
pub const DATABASE_CODES: [&str; 3] = ["NSE", "WIKI", "ZACKS"];

/// Datasets of `NSE` served by the listing, two per page.
pub const NSE_DATASET_CODES: [&str; 3] = ["OIL", "TCS", "INFY"];

/// Bytes returned as the bulk archive of a known database.
pub const BULK_ARCHIVE: &str = "PK\u{3}\u{4}datalink-bulk-archive";

const PER_PAGE: usize = 2;

fn list_meta(page: usize, total: usize) -> Value {
    let total_pages = total.div_ceil(PER_PAGE).max(1);
    let first = (page - 1) * PER_PAGE + 1;
    let last = (page * PER_PAGE).min(total);
    json!({
        "query": "",
        "per_page": PER_PAGE,
        "current_page": page,
        "prev_page": (page > 1).then(|| page - 1),
        "total_pages": total_pages,
        "total_count": total,
        "next_page": (page < total_pages).then(|| page + 1),
        "current_first_item": (first <= last).then_some(first),
        "current_last_item": (first <= last).then_some(last),
    })
}

fn slice<'a>(codes: &'a [&'a str], page: usize) -> &'a [&'a str] {
    let start = ((page - 1) * PER_PAGE).min(codes.len());
    let end = (start + PER_PAGE).min(codes.len());
    &codes[start..end]
}

/// `{"databases": [...], "meta": {...}}` for a 1-based `page`.
#[must_use]
pub fn database_list(page: usize) -> Value {
    let page = page.max(1);
    let items: Vec<Value> = slice(&DATABASE_CODES, page)
        .iter()
        .map(|code| super::metadata::database(code)["database"].clone())
        .collect();
    json!({"databases": items, "meta": list_meta(page, DATABASE_CODES.len())})
}

/// `{"datasets": [...], "meta": {...}}` for `database_code` and a 1-based `page`.
///
/// Only `NSE` has datasets; other codes yield an empty listing.
#[must_use]
pub fn dataset_list(database_code: &str, page: usize) -> Value {
    let page = page.max(1);
    let codes: &[&str] = if database_code == "NSE" {
        &NSE_DATASET_CODES
    } else {
        &[]
    };
    let items: Vec<Value> = slice(codes, page)
        .iter()
        .map(|code| super::metadata::dataset(database_code, code)["dataset"].clone())
        .collect();
    json!({"datasets": items, "meta": list_meta(page, codes.len())})
}
