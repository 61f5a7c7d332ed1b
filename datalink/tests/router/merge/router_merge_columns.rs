use datalink::{DataLinkError, FetchFlags, Params, Selector, SeriesReference};

use crate::helpers::{AAPL, MSFT, mock_client};

#[tokio::test]
async fn single_columns_are_filtered_server_side() {
    let (client, transport) = mock_client();
    let res = client
        .get(
            Selector::parse_many(&["WIKI/AAPL.1", "WIKI/MSFT.2"]).unwrap(),
            Params::new(),
        )
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].query_values("column_index"), vec!["1"]);
    assert_eq!(requests[1].query_values("column_index"), vec!["2"]);
    assert_eq!(
        res.columns(),
        &["Date", "WIKI/AAPL - column.1", "WIKI/MSFT - column.2"]
    );
}

#[tokio::test]
async fn top_level_column_index_is_ignored() {
    let (client, transport) = mock_client();
    let res = client
        .get(
            Selector::parse_many(&[AAPL, MSFT]).unwrap(),
            Params::new().column_index(3),
        )
        .await
        .unwrap();

    for r in transport.requests().await {
        assert!(r.query_values("column_index").is_empty());
    }
    assert_eq!(res.columns().len(), 7);
}

#[tokio::test]
async fn several_columns_are_filtered_locally() {
    let (client, transport) = mock_client();
    let refs = [SeriesReference::new(AAPL).unwrap().with_columns([3, 1])];
    let res = client
        .merge_series(&refs, Params::new(), FetchFlags::STRICT)
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert!(requests[0].query_values("column_index").is_empty());
    assert_eq!(
        res.columns(),
        &["Date", "WIKI/AAPL - column.3", "WIKI/AAPL - column.1"]
    );
}

#[tokio::test]
async fn bad_local_index_aborts_unless_tolerated() {
    let (client, _) = mock_client();
    let refs = [
        SeriesReference::new(AAPL).unwrap().with_columns([1, 9]),
        SeriesReference::new(MSFT).unwrap(),
    ];

    let err = client
        .merge_series(&refs, Params::new(), FetchFlags::STRICT)
        .await
        .expect_err("column 9 is out of range");
    assert!(matches!(
        err,
        DataLinkError::ColumnIndexOutOfRange { index: 9, max: Some(3), .. }
    ));

    let res = client
        .merge_series(&refs, Params::new(), FetchFlags::TOLERANT)
        .await
        .unwrap();
    assert_eq!(res.columns()[1], "WIKI/AAPL - Not Found");
    assert_eq!(res.columns().len(), 5);
}

#[tokio::test]
async fn non_positive_index_fails_before_any_request() {
    let (client, transport) = mock_client();
    let refs = [
        SeriesReference::new(MSFT).unwrap(),
        SeriesReference::new(AAPL).unwrap().with_columns([-1]),
    ];
    let err = client
        .merge_series(&refs, Params::new(), FetchFlags::STRICT)
        .await
        .expect_err("negative index");
    assert!(err.is_column_not_found());
    assert_eq!(transport.request_count().await, 0);

    let res = client
        .merge_series(&refs, Params::new(), FetchFlags::TOLERANT)
        .await
        .unwrap();
    assert_eq!(res.columns().last().map(String::as_str), Some("WIKI/AAPL - Not Found"));
    assert_eq!(transport.request_count().await, 1);
}

#[tokio::test]
async fn zero_index_anywhere_fails_before_any_request() {
    let (client, transport) = mock_client();
    let refs = [
        SeriesReference::new(AAPL).unwrap(),
        SeriesReference::new(MSFT).unwrap().with_columns([0]),
    ];

    let err = client
        .merge_series(&refs, Params::new(), FetchFlags::STRICT)
        .await
        .expect_err("column 0 is the date axis");
    assert!(matches!(
        err,
        DataLinkError::ColumnIndexOutOfRange { index: 0, max: None, .. }
    ));
    assert_eq!(
        err.to_string(),
        "WIKI/MSFT: requested index 0 is out of range. Min index is 1"
    );
    assert_eq!(transport.request_count().await, 0);

    let res = client
        .merge_series(&refs, Params::new(), FetchFlags::TOLERANT)
        .await
        .unwrap();
    assert_eq!(res.columns().last().map(String::as_str), Some("WIKI/MSFT - Not Found"));
    assert_eq!(transport.request_count().await, 1);
}
