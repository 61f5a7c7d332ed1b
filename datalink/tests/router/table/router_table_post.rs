use datalink::{HttpMethod, Params};
use serde_json::json;

use crate::helpers::{TABLE, builder, mock_client, mock_client_with, request_param};

fn many_tickers() -> Params {
    let tickers: Vec<String> = (0..50).map(|i| format!("T{i:03}")).collect();
    Params::new().with("ticker", json!(tickers))
}

#[tokio::test]
async fn long_urls_switch_to_post_body() {
    let (client, transport) = mock_client_with(builder().max_url_length_for_get(200));
    let res = client
        .table(TABLE)
        .params(many_tickers())
        .paginate(true)
        .run()
        .await
        .unwrap();
    assert_eq!(res.len(), 3);

    let requests = transport.requests().await;
    assert!(requests.iter().all(|r| r.method == HttpMethod::Post));
    let body = requests[0].body.as_ref().expect("post body");
    assert_eq!(body["ticker"].as_array().map(Vec::len), Some(50));
    assert!(requests[0].query.is_empty());
    assert_eq!(request_param(&requests[1], "qopts.cursor_id").as_deref(), Some("c1"));
}

#[tokio::test]
async fn short_urls_stay_get() {
    let (client, transport) = mock_client();
    client
        .table(TABLE)
        .params(Params::new().with("ticker", "AAPL"))
        .run()
        .await
        .unwrap();
    let requests = transport.requests().await;
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert!(requests[0].body.is_none());
}

#[tokio::test]
async fn disabling_get_forces_post() {
    let (client, transport) = mock_client_with(builder().use_get_requests(false));
    client.table(TABLE).run().await.unwrap();
    assert_eq!(transport.requests().await[0].method, HttpMethod::Post);
}
