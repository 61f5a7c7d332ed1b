use datalink::{DataLink, Params, REQUEST_SOURCE, Selector};

use crate::helpers::{OIL, builder, mock_client, mock_client_with};

#[tokio::test]
async fn every_request_carries_client_headers() {
    let (client, transport) = mock_client();
    client
        .get(Selector::parse(OIL).unwrap(), Params::new())
        .await
        .unwrap();

    let request = &transport.requests().await[0];
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("x-api-token"), Some("test-key"));
    assert_eq!(request.header("request-source"), Some(REQUEST_SOURCE));
    assert_eq!(
        request.header("request-source-version"),
        Some(env!("CARGO_PKG_VERSION"))
    );
    assert!(request.url().starts_with("https://data.nasdaq.com/api/v3/datasets/NSE/OIL/data?"));
}

#[tokio::test]
async fn api_version_extends_accept_header() {
    let (client, transport) = mock_client_with(builder().api_version("2015-04-09"));
    client.table("ZACKS/FC").run().await.unwrap();

    let request = &transport.requests().await[0];
    assert_eq!(
        request.header("accept"),
        Some("application/json, application/vnd.data.nasdaq+json;version=2015-04-09")
    );
}

#[tokio::test]
async fn no_key_means_no_token_header() {
    let (client, transport) = mock_client_with(DataLink::builder());
    client
        .get(Selector::parse(OIL).unwrap(), Params::new())
        .await
        .unwrap();
    assert!(transport.requests().await[0].header("x-api-token").is_none());
}

#[tokio::test]
async fn api_base_override_is_used() {
    let (client, transport) = mock_client_with(builder().api_base("http://localhost:9999/api/v3/"));
    client
        .get(Selector::parse(OIL).unwrap(), Params::new())
        .await
        .unwrap();
    let request = &transport.requests().await[0];
    assert_eq!(request.base, "http://localhost:9999/api/v3");
    assert_eq!(client.config().api_base, "http://localhost:9999/api/v3");
}

#[cfg(feature = "http")]
#[test]
fn default_transport_is_http() {
    let client = DataLink::builder().build().unwrap();
    assert_eq!(client.transport_name(), "datalink-http");
}
