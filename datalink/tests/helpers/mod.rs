// Re-export helpers so tests can `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use datalink::{Cell, DataLink, DataLinkBuilder};
use datalink_mock::{DynamicMockController, DynamicMockTransport, MockTransport};

pub use datalink_mock::fixtures;
pub use datalink_mock::{MockBehavior, request_param};

/// Series known to the fixture transport.
pub const OIL: &str = "NSE/OIL";
pub const AAPL: &str = "WIKI/AAPL";
pub const MSFT: &str = "WIKI/MSFT";
pub const MISSING: &str = "NSE/MISSING";
pub const TABLE: &str = "ZACKS/FC";

/// Builder preloaded with a test key and nothing else.
pub fn builder() -> DataLinkBuilder {
    DataLink::builder().api_key("test-key")
}

/// Client over the fixture transport, plus a handle to inspect its requests.
pub fn mock_client() -> (DataLink, Arc<MockTransport>) {
    mock_client_with(builder())
}

/// Like [`mock_client`] but starting from a custom builder.
pub fn mock_client_with(builder: DataLinkBuilder) -> (DataLink, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = builder
        .transport(transport.clone())
        .build()
        .expect("mock client builds");
    (client, transport)
}

/// Client over a scriptable transport.
pub fn dynamic_client() -> (DataLink, DynamicMockController) {
    let (transport, controller) = DynamicMockTransport::new_with_controller("dynamic");
    let client = builder()
        .transport(transport)
        .build()
        .expect("dynamic client builds");
    (client, controller)
}

/// Calendar date for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
}

/// Date cell for readability in tests.
pub fn date(y: i32, m: u32, day: u32) -> Cell {
    Cell::Date(d(y, m, day))
}
