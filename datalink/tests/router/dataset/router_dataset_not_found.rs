use datalink::{DataLinkError, FetchFlags, Params, Selector, SeriesReference};

use crate::helpers::{AAPL, MISSING, MockBehavior, OIL, dynamic_client, fixtures, mock_client};

#[tokio::test]
async fn unknown_series_is_not_found_for_single_get() {
    let (client, _) = mock_client();
    let err = client
        .get(Selector::parse(MISSING).unwrap(), Params::new())
        .await
        .expect_err("unknown code");
    assert!(err.is_not_found());
    assert_eq!(err.http_status(), Some(404));
    assert_eq!(
        err.details().and_then(|d| d.code.as_deref()),
        Some("QECx02")
    );
}

#[tokio::test]
async fn tolerated_not_found_yields_placeholder() {
    let (client, _) = mock_client();
    let reference = SeriesReference::new(MISSING).unwrap();
    let res = client
        .fetch_series(&reference, Params::new(), FetchFlags::TOLERANT)
        .await
        .unwrap();
    assert!(res.is_not_found());
    assert_eq!(res.columns(), &["None", "Not Found"]);
    assert!(res.is_empty());
}

#[tokio::test]
async fn missing_column_is_tolerated_by_single_get() {
    let (client, _) = mock_client();
    let res = client
        .get(Selector::parse("WIKI/AAPL.9").unwrap(), Params::new())
        .await
        .unwrap();
    assert!(res.is_not_found());
}

#[tokio::test]
async fn missing_column_fails_when_strict() {
    let (client, _) = mock_client();
    let reference = SeriesReference::parse("WIKI/AAPL.9").unwrap();
    let err = client
        .fetch_series(&reference, Params::new(), FetchFlags::STRICT)
        .await
        .expect_err("column 9 does not exist");
    assert!(matches!(err, DataLinkError::ColumnNotFound(_)));
}

#[tokio::test]
async fn zero_index_fails_before_any_request() {
    let (client, transport) = mock_client();
    let reference = SeriesReference::new(AAPL).unwrap().with_columns([0]);
    let err = client
        .fetch_series(&reference, Params::new(), FetchFlags::STRICT)
        .await
        .expect_err("column 0 is the date axis");
    assert!(matches!(
        err,
        DataLinkError::ColumnIndexOutOfRange { index: 0, .. }
    ));
    assert_eq!(transport.request_count().await, 0);
}

#[tokio::test]
async fn other_kinds_are_never_downgraded() {
    let (client, ctl) = dynamic_client();
    ctl.set(
        "datasets/NSE/OIL/data",
        MockBehavior::Return(fixtures::errors::limit_exceeded()),
    )
    .await;
    let reference = SeriesReference::new(OIL).unwrap();
    let err = client
        .fetch_series(&reference, Params::new(), FetchFlags::TOLERANT)
        .await
        .expect_err("rate limit is not a missing series");
    assert!(matches!(err, DataLinkError::LimitExceeded(_)));

    let (client, _) = mock_client();
    let reference = SeriesReference::new("FAIL/ANY").unwrap();
    let err = client
        .fetch_series(&reference, Params::new(), FetchFlags::TOLERANT)
        .await
        .expect_err("transport failure");
    assert!(matches!(err, DataLinkError::Transport(_)));
}

#[tokio::test]
async fn error_codes_map_to_kinds() {
    let (client, ctl) = dynamic_client();
    let reference = SeriesReference::new(OIL).unwrap();
    let cases: [(u16, &str, fn(&DataLinkError) -> bool); 6] = [
        (401, "QEAx01", |e| matches!(e, DataLinkError::Authentication(_))),
        (403, "QEPx02", |e| matches!(e, DataLinkError::Forbidden(_))),
        (400, "QESx03", |e| matches!(e, DataLinkError::InvalidRequest(_))),
        (500, "QEMx01", |e| matches!(e, DataLinkError::InternalServer(_))),
        (503, "QEXx01", |e| matches!(e, DataLinkError::ServiceUnavailable(_))),
        (418, "ZZZ", |e| matches!(e, DataLinkError::Api(_))),
    ];
    for (status, code, check) in cases {
        ctl.set(
            "datasets/NSE/OIL/data",
            MockBehavior::error(status, code, "boom"),
        )
        .await;
        let err = client
            .fetch_series(&reference, Params::new(), FetchFlags::STRICT)
            .await
            .expect_err("scripted failure");
        assert!(check(&err), "{code} mapped to {err:?}");
        assert_eq!(err.http_status(), Some(status));
    }
}
