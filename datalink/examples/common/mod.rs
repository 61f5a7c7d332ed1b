use std::sync::Arc;

use datalink::{DataLink, DataLinkError, Transport};

/// Client over the fixture transport when `DATALINK_EXAMPLES_USE_MOCK` is set,
/// otherwise over HTTP with the key from the environment.
pub fn get_client() -> Result<DataLink, DataLinkError> {
    if std::env::var("DATALINK_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Transport for CI) ---");
        let transport: Arc<dyn Transport> = Arc::new(datalink_mock::MockTransport::new());
        DataLink::builder().transport(transport).build()
    } else {
        DataLink::builder().from_env().build()
    }
}
