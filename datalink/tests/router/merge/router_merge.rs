use datalink::{Cell, Params, ResultKind, Selector};

use crate::helpers::{AAPL, MISSING, MSFT, d, date, mock_client};

fn both(first: &str, second: &str) -> Selector {
    Selector::parse_many(&[first, second]).unwrap()
}

#[tokio::test]
async fn two_series_outer_join_on_dates() {
    let (client, transport) = mock_client();
    let res = client.get(both(AAPL, MSFT), Params::new()).await.unwrap();

    assert_eq!(transport.request_count().await, 2);
    assert_eq!(res.kind(), ResultKind::Merged);
    assert_eq!(
        res.columns(),
        &[
            "Date",
            "WIKI/AAPL - column.1",
            "WIKI/AAPL - column.2",
            "WIKI/AAPL - column.3",
            "WIKI/MSFT - column.1",
            "WIKI/MSFT - column.2",
            "WIKI/MSFT - column.3",
        ]
    );
    let keys: Vec<Cell> = res.rows().iter().map(|r| r[0].clone()).collect();
    assert_eq!(
        keys,
        vec![
            date(2015, 7, 11),
            date(2015, 7, 13),
            date(2015, 7, 14),
            date(2015, 7, 15),
            date(2015, 7, 16),
        ]
    );
    // 07-16 only exists in MSFT
    let last = res.rows().last().unwrap();
    assert!(last[1..4].iter().all(Cell::is_null));
    assert_eq!(last[4], Cell::Float(1.5));
    // 07-15 exists in both
    assert_eq!(res.rows()[3][1], Cell::Float(440.0));
    assert_eq!(res.rows()[3][4], Cell::Float(1.0));
}

#[tokio::test]
async fn input_order_changes_columns_not_keys() {
    let (client, _) = mock_client();
    let ab = client.get(both(AAPL, MSFT), Params::new()).await.unwrap();
    let ba = client.get(both(MSFT, AAPL), Params::new()).await.unwrap();

    let keys = |r: &datalink::FetchResult| r.to_table().index().to_vec();
    assert_eq!(keys(&ab), keys(&ba));
    assert_eq!(ab.columns()[1], "WIKI/AAPL - column.1");
    assert_eq!(ba.columns()[1], "WIKI/MSFT - column.1");
}

#[tokio::test]
async fn descending_merge_is_exact_reverse() {
    let (client, _) = mock_client();
    let asc = client.get(both(AAPL, MSFT), Params::new()).await.unwrap();
    let desc = client
        .get(both(AAPL, MSFT), Params::new().with("order", "desc"))
        .await
        .unwrap();

    let mut reversed = asc.rows().to_vec();
    reversed.reverse();
    assert_eq!(desc.rows(), reversed.as_slice());
    assert_eq!(desc.columns(), asc.columns());
}

#[tokio::test]
async fn missing_series_contributes_not_found_column() {
    let (client, _) = mock_client();
    let res = client.get(both(AAPL, MISSING), Params::new()).await.unwrap();

    assert_eq!(res.columns().last().map(String::as_str), Some("NSE/MISSING - Not Found"));
    assert_eq!(res.len(), 4);
    assert!(res.rows().iter().all(|r| r.last().is_some_and(Cell::is_null)));
}

#[tokio::test]
async fn merged_metadata_spans_inputs() {
    let (client, _) = mock_client();
    let res = client.get(both(AAPL, MSFT), Params::new()).await.unwrap();

    let meta = res.meta();
    assert_eq!(meta.start(), Some(d(2014, 2, 1)));
    assert_eq!(meta.end(), Some(d(2015, 7, 29)));
    assert_eq!(meta.column_index, None);
    let names: Vec<String> = meta.column_name_strings();
    assert_eq!(names, res.columns());
}

#[tokio::test]
async fn each_series_gets_its_own_params() {
    let (client, transport) = mock_client();
    client
        .get(
            Selector::parse_many(&["WIKI/AAPL.1", "WIKI/MSFT"]).unwrap(),
            Params::new().with("rows", 2),
        )
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].query_values("column_index"), vec!["1"]);
    assert!(requests[1].query_values("column_index").is_empty());
    for r in &requests {
        assert_eq!(r.query_values("rows"), vec!["2"]);
        assert_eq!(r.query_values("order"), vec!["asc"]);
    }
}
