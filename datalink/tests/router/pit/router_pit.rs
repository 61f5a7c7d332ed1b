use datalink::{DataLinkError, Params, PitInterval, PitRequest, ResultKind, Warning};

use crate::helpers::{TABLE, builder, d, mock_client, mock_client_with};

#[tokio::test]
async fn asof_reads_first_page_with_warning() {
    let (client, transport) = mock_client();
    let res = client
        .point_in_time(PitRequest::new(TABLE, PitInterval::AsOf(Some(d(2020, 1, 1)))))
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].path, "pit/ZACKS/FC/asofdate/2020-01-01");
    assert_eq!(res.kind(), ResultKind::Table);
    assert_eq!(res.len(), 1);
    assert!(matches!(
        res.warnings(),
        [Warning::MorePagesAvailable { .. }]
    ));
}

#[tokio::test]
async fn between_paginates_to_the_end() {
    let (client, transport) = mock_client();
    let request = PitRequest::new(
        TABLE,
        PitInterval::Between {
            start: d(2020, 1, 1),
            end: d(2020, 6, 30),
        },
    )
    .params(Params::new().with("ticker", "AAPL"))
    .paginate(true);
    let res = client.point_in_time(request).await.unwrap();

    assert_eq!(res.len(), 3);
    assert!(res.warnings().is_empty());
    let requests = transport.requests().await;
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| r.path == "pit/ZACKS/FC/between/2020-01-01/2020-06-30"));
    assert!(requests.iter().all(|r| r.query_values("ticker") == vec!["AAPL"]));
}

#[tokio::test]
async fn page_limit_is_an_error() {
    let (client, transport) = mock_client_with(builder().page_limit(2));
    let request = PitRequest::new(
        TABLE,
        PitInterval::From {
            start: d(2020, 1, 1),
            end: d(2020, 6, 30),
        },
    )
    .paginate(true);
    let err = client
        .point_in_time(request)
        .await
        .expect_err("more pages than the limit");
    assert!(matches!(err, DataLinkError::LimitExceeded(_)));
    assert_eq!(transport.request_count().await, 2);
    assert_eq!(
        transport.requests().await[0].path,
        "pit/ZACKS/FC/from/2020-01-01/to/2020-06-30"
    );
}
