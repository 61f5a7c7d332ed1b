use datalink::{Cell, DataLinkError, Params, ResultKind, Warning};
use serde_json::json;

use crate::helpers::{
    MockBehavior, TABLE, builder, d, dynamic_client, fixtures, mock_client, mock_client_with,
    request_param,
};

#[tokio::test]
async fn paginate_reads_every_page() {
    let (client, transport) = mock_client();
    let res = client.table(TABLE).paginate(true).run().await.unwrap();

    assert_eq!(res.kind(), ResultKind::Table);
    assert_eq!(res.columns(), &["per_end_date", "ticker", "tot_oper_exp"]);
    assert_eq!(res.len(), 3);
    assert!(res.warnings().is_empty());
    assert_eq!(res.rows()[2][1], Cell::Text("MSFT".into()));
    assert_eq!(res.rows()[0][0], Cell::Date(d(2015, 7, 11)));
    assert_eq!(res.meta().columns.as_ref().map(Vec::len), Some(3));

    let requests = transport.requests().await;
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.path == "datatables/ZACKS/FC"));
    let cursors: Vec<Option<String>> = requests
        .iter()
        .map(|r| request_param(r, "qopts.cursor_id"))
        .collect();
    assert_eq!(cursors, vec![None, Some("c1".into()), Some("c2".into())]);
}

#[tokio::test]
async fn without_paginate_first_page_and_warning() {
    let (client, transport) = mock_client();
    let res = client.table(TABLE).run().await.unwrap();

    assert_eq!(res.len(), 1);
    assert_eq!(transport.request_count().await, 1);
    assert_eq!(
        res.warnings(),
        &[Warning::MorePagesAvailable {
            code: TABLE.into(),
            next_cursor_id: "c1".into(),
        }]
    );
}

#[tokio::test]
async fn page_limit_stops_with_warning() {
    let (client, transport) = mock_client_with(builder().page_limit(2));
    let res = client.table(TABLE).paginate(true).run().await.unwrap();

    assert_eq!(res.len(), 2);
    assert_eq!(transport.request_count().await, 2);
    assert_eq!(
        res.warnings(),
        &[Warning::PageLimitReached {
            code: TABLE.into(),
            pages: 2,
            limit: 2,
        }]
    );
}

#[tokio::test]
async fn page_limit_counts_the_first_page() {
    let (client, transport) = mock_client_with(builder().page_limit(1));
    let res = client.table(TABLE).paginate(true).run().await.unwrap();

    assert_eq!(transport.request_count().await, 1);
    assert_eq!(
        res.warnings(),
        &[Warning::PageLimitReached {
            code: TABLE.into(),
            pages: 1,
            limit: 1,
        }]
    );
}

#[tokio::test]
async fn caller_params_are_resent_on_every_page() {
    let (client, transport) = mock_client();
    let params = Params::new()
        .with("ticker", json!(["AAPL", "MSFT"]))
        .per_page(1);
    client
        .table(TABLE)
        .params(params)
        .paginate(true)
        .run()
        .await
        .unwrap();

    for r in transport.requests().await {
        assert_eq!(r.query_values("ticker[]"), vec!["AAPL", "MSFT"]);
        assert_eq!(r.query_values("qopts.per_page"), vec!["1"]);
    }
}

#[tokio::test]
async fn pages_must_agree_on_columns() {
    let (client, ctl) = dynamic_client();
    let first = fixtures::datatables::page(json!([["2015-07-11", "AAPL", 1.0]]), Some("c1"));
    let mut second = fixtures::datatables::page(json!([["AAPL", 1.0]]), None);
    second["datatable"]["columns"] = json!([
        {"name": "ticker", "type": "String"},
        {"name": "tot_oper_exp", "type": "BigDecimal(11,4)"}
    ]);
    ctl.push("datatables/ZACKS/FC", MockBehavior::json(&first)).await;
    ctl.push("datatables/ZACKS/FC", MockBehavior::json(&second)).await;

    let err = client
        .table(TABLE)
        .paginate(true)
        .run()
        .await
        .expect_err("second page has different columns");
    assert!(matches!(err, DataLinkError::InvalidData(_)));
}

#[tokio::test]
async fn ragged_page_is_invalid_data() {
    let (client, ctl) = dynamic_client();
    let page = fixtures::datatables::page(json!([["2015-07-11", "AAPL"]]), None);
    ctl.set("datatables/ZACKS/FC", MockBehavior::json(&page)).await;

    let err = client.table(TABLE).run().await.expect_err("short row");
    assert!(matches!(err, DataLinkError::InvalidData(_)));
}

#[tokio::test]
async fn unknown_and_malformed_tables() {
    let (client, transport) = mock_client();
    let err = client.table("ZACKS/NOPE").run().await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.table("ZACKS").run().await.unwrap_err();
    assert!(matches!(err, DataLinkError::InvalidArg(_)));
    assert_eq!(transport.request_count().await, 1);
}

#[tokio::test]
async fn error_mid_pagination_is_returned() {
    let (client, ctl) = dynamic_client();
    let first = fixtures::datatables::page(json!([["2015-07-11", "AAPL", 1.0]]), Some("c1"));
    ctl.push("datatables/ZACKS/FC", MockBehavior::json(&first)).await;
    ctl.push(
        "datatables/ZACKS/FC",
        MockBehavior::Return(fixtures::errors::limit_exceeded()),
    )
    .await;

    let err = client.table(TABLE).paginate(true).run().await.unwrap_err();
    assert!(matches!(err, DataLinkError::LimitExceeded(_)));
    assert_eq!(ctl.requests().await.len(), 2);
}
