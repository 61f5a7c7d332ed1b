use datalink::{Params, Selector, Warning};

use crate::helpers::{AAPL, MSFT, OIL, mock_client};

#[tokio::test]
async fn legacy_names_are_translated_with_warnings() {
    let (client, transport) = mock_client();
    let res = client
        .get(
            Selector::parse(OIL).unwrap(),
            Params::new()
                .with("trim_start", "2015-01-01")
                .with("sort_order", "desc"),
        )
        .await
        .unwrap();

    let request = &transport.requests().await[0];
    assert_eq!(request.query_values("start_date"), vec!["2015-01-01"]);
    assert_eq!(request.query_values("order"), vec!["desc"]);
    assert!(request.query_values("trim_start").is_empty());
    assert!(request.query_values("sort_order").is_empty());
    assert_eq!(
        res.warnings(),
        &[
            Warning::DeprecatedParam {
                old: "trim_start".into(),
                new: "start_date".into(),
            },
            Warning::DeprecatedParam {
                old: "sort_order".into(),
                new: "order".into(),
            },
        ]
    );
}

#[tokio::test]
async fn api_key_option_becomes_header_for_every_series() {
    let (client, transport) = mock_client();
    client
        .get(
            Selector::parse_many(&[AAPL, MSFT]).unwrap(),
            Params::new().with("api_key", "per-call"),
        )
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests.len(), 2);
    for r in &requests {
        assert_eq!(r.header("x-api-token"), Some("per-call"));
        assert!(r.query_values("api_key").is_empty());
    }
    // the client itself is unchanged
    assert_eq!(client.config().api_key.as_deref(), Some("test-key"));
}

#[tokio::test]
async fn authtoken_is_an_alias_for_api_key() {
    let (client, transport) = mock_client();
    let res = client
        .table("ZACKS/FC")
        .params(Params::new().with("authtoken", "legacy"))
        .run()
        .await
        .unwrap();

    let request = &transport.requests().await[0];
    assert_eq!(request.header("x-api-token"), Some("legacy"));
    assert!(request.query_values("authtoken").is_empty());
    assert!(res.warnings().iter().any(|w| matches!(
        w,
        Warning::DeprecatedParam { old, .. } if old == "authtoken"
    )));
}
