use datalink::{Cell, DataLinkError, FetchFlags, Params, ResultKind, Selector, SeriesReference};

use crate::helpers::{AAPL, OIL, date, mock_client};

#[tokio::test]
async fn single_code_makes_one_request_to_data_path() {
    let (client, transport) = mock_client();
    let res = client
        .get(Selector::parse(OIL).unwrap(), Params::new())
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "datasets/NSE/OIL/data");
    assert_eq!(requests[0].query_values("order"), vec!["asc"]);
    assert!(requests[0].query_values("database_code").is_empty());

    assert_eq!(res.kind(), ResultKind::Series);
    assert_eq!(res.columns(), &["Date", "column.1"]);
    assert_eq!(res.rows(), &[vec![date(2015, 7, 11), Cell::Float(444.3)]]);

    let table = res.to_table();
    assert_eq!(table.index_name(), Some("Date"));
    assert_eq!(table.columns(), &["column.1"]);
    assert_eq!(table.index(), &[date(2015, 7, 11)]);
}

#[tokio::test]
async fn caller_order_wins_over_default() {
    let (client, transport) = mock_client();
    let res = client
        .get(
            Selector::parse(AAPL).unwrap(),
            Params::new().with("order", "desc"),
        )
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].query_values("order"), vec!["desc"]);
    assert_eq!(res.rows().first().map(|r| r[0].clone()), Some(date(2015, 7, 15)));
}

#[tokio::test]
async fn column_suffix_is_sent_as_column_index() {
    let (client, transport) = mock_client();
    let res = client
        .get(Selector::parse("WIKI/AAPL.2").unwrap(), Params::new())
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].query_values("column_index"), vec!["2"]);
    assert_eq!(res.columns(), &["Date", "column.2"]);
    assert_eq!(res.meta().column_index, Some(2));
    assert_eq!(res.rows()[0], vec![date(2015, 7, 11), Cell::Int(10)]);
}

#[tokio::test]
async fn several_columns_are_projected_locally() {
    let (client, transport) = mock_client();
    let reference = SeriesReference::new(AAPL).unwrap().with_columns([3, 1]);
    let res = client
        .fetch_series(&reference, Params::new(), FetchFlags::STRICT)
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert!(requests[0].query_values("column_index").is_empty());
    assert_eq!(res.columns(), &["Date", "column.3", "column.1"]);
    assert_eq!(res.rows()[0], vec![date(2015, 7, 11), Cell::Int(3), Cell::Float(444.3)]);
    assert_eq!(res.len(), 4);
}

#[tokio::test]
async fn ragged_rows_are_invalid_data() {
    let (client, _) = mock_client();
    let err = client
        .get(Selector::parse("BAD/RAGGED").unwrap(), Params::new())
        .await
        .expect_err("ragged payload must fail");
    assert!(matches!(err, DataLinkError::InvalidData(_)));
}

#[tokio::test]
async fn malformed_code_is_rejected_before_any_request() {
    assert!(matches!(
        Selector::parse("NSEOIL"),
        Err(DataLinkError::InvalidArg(_))
    ));
    assert!(matches!(
        Selector::parse("NSE/OIL.one"),
        Err(DataLinkError::InvalidArg(_))
    ));
}

#[tokio::test]
async fn csv_has_header_then_rows() {
    let (client, _) = mock_client();
    let res = client
        .get(Selector::parse(OIL).unwrap(), Params::new())
        .await
        .unwrap();
    let csv = res.to_csv().unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Date,column.1"));
    assert_eq!(lines.next(), Some("2015-07-11,444.3"));
    assert_eq!(lines.next(), None);
}
