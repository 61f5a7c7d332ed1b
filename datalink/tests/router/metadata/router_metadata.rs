use datalink::{DataLinkError, Params};

use crate::helpers::{MISSING, OIL, TABLE, builder, d, mock_client, mock_client_with};

#[tokio::test]
async fn dataset_metadata_is_typed() {
    let (client, transport) = mock_client();
    let meta = client.dataset_metadata(OIL).await.unwrap();

    assert_eq!(transport.requests().await[0].path, "datasets/NSE/OIL/metadata");
    assert_eq!(meta.code(), OIL);
    assert_eq!(meta.newest_available_date, Some(d(2015, 7, 23)));
    assert_eq!(meta.oldest_available_date, Some(d(2014, 1, 1)));
    assert_eq!(meta.column_names.len(), 4);
    assert_eq!(meta.kind.as_deref(), Some("Time Series"));
    assert!(meta.refreshed_at.is_some());
}

#[tokio::test]
async fn database_metadata_is_typed() {
    let (client, transport) = mock_client();
    let meta = client.database_metadata("NSE").await.unwrap();

    assert_eq!(transport.requests().await[0].path, "databases/NSE");
    assert_eq!(meta.database_code, "NSE");
    assert_eq!(meta.datasets_count, Some(1877));
    assert_eq!(meta.premium, Some(false));
}

#[tokio::test]
async fn datatable_metadata_is_typed() {
    let (client, transport) = mock_client();
    let meta = client.datatable_metadata(TABLE).await.unwrap();

    assert_eq!(transport.requests().await[0].path, "datatables/ZACKS/FC/metadata");
    assert_eq!(meta.vendor_code, "ZACKS");
    assert_eq!(meta.columns.len(), 3);
    assert_eq!(meta.filters, vec!["ticker", "per_end_date"]);
    assert_eq!(meta.primary_key, vec!["ticker", "per_end_date"]);
    assert!(!meta.extra.contains_key("primary_key"));
    assert_eq!(meta.extra["status"]["status"], "ON TIME");
}

#[tokio::test]
async fn unknown_metadata_is_not_found() {
    let (client, _) = mock_client();
    let err = client.dataset_metadata(MISSING).await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.database_metadata("NOPE").await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.database_metadata("NSE/OIL").await.unwrap_err();
    assert!(matches!(err, DataLinkError::InvalidArg(_)));
}

#[test]
fn bulk_download_url_carries_credentials_and_params() {
    let (client, _) = mock_client_with(builder().api_version("2015-04-09"));
    let url = client
        .bulk_download_url("NSE", &Params::new().with("download_type", "partial"))
        .unwrap();
    assert_eq!(
        url,
        "https://data.nasdaq.com/api/v3/databases/NSE/data?api_key=test-key&api_version=2015-04-09&download_type=partial"
    );
}

#[test]
fn bulk_download_url_without_key_has_no_query() {
    let (client, _) = mock_client_with(datalink::DataLink::builder());
    let url = client.bulk_download_url("NSE", &Params::new()).unwrap();
    assert_eq!(url, "https://data.nasdaq.com/api/v3/databases/NSE/data");
}

#[tokio::test]
async fn database_listing_reports_paging() {
    let (client, transport) = mock_client();
    let first = client.databases(Params::new()).await.unwrap();

    let sent = &transport.requests().await[0];
    assert_eq!(sent.path, "databases");
    assert_eq!(sent.query_values("page"), vec!["1"]);
    assert_eq!(sent.query_values("query"), vec![""]);
    assert_eq!(first.len(), 2);
    assert_eq!(first.items[0].database_code, "NSE");
    assert_eq!(first.meta.current_page, 1);
    assert_eq!(first.meta.next_page, Some(2));
    assert_eq!(first.meta.total_count, 3);
    assert!(first.has_more_results());

    let last = client
        .databases(Params::new().with("page", 2))
        .await
        .unwrap();
    assert_eq!(last.items[0].database_code, "ZACKS");
    assert_eq!(last.meta.next_page, None);
    assert!(!last.has_more_results());
}

#[tokio::test]
async fn dataset_listing_is_scoped_to_database() {
    let (client, transport) = mock_client();
    let page = client
        .datasets("NSE", Params::new().with("database_code", "WIKI"))
        .await
        .unwrap();

    let sent = &transport.requests().await[0];
    assert_eq!(sent.path, "datasets");
    assert_eq!(sent.query_values("database_code"), vec!["NSE"]);
    let codes: Vec<String> = page.items.iter().map(|m| m.code()).collect();
    assert_eq!(codes, vec!["NSE/OIL", "NSE/TCS"]);
    assert_eq!(page.meta.total_pages, 2);

    let err = client.datasets(" ", Params::new()).await.unwrap_err();
    assert!(matches!(err, DataLinkError::InvalidArg(_)));
}

#[tokio::test]
async fn bulk_download_writes_archive_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (client, transport) = mock_client();
    let done = client
        .bulk_download_to_file(
            "NSE",
            dir.path(),
            Params::new()
                .with("download_type", "partial")
                .with("api_key", "override"),
        )
        .await
        .unwrap();

    assert_eq!(done.path, dir.path().join("data"));
    assert_eq!(done.bytes, datalink_mock::fixtures::catalogue::BULK_ARCHIVE.len() as u64);
    assert_eq!(
        std::fs::read_to_string(&done.path).unwrap(),
        datalink_mock::fixtures::catalogue::BULK_ARCHIVE
    );

    let sent = &transport.requests().await[0];
    assert_eq!(sent.path, "databases/NSE/data");
    assert_eq!(sent.query_values("download_type"), vec!["partial"]);
    assert!(sent.query_values("api_key").is_empty());
    assert_eq!(sent.header("x-api-token"), Some("override"));
}

#[tokio::test]
async fn bulk_download_to_named_file_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nse.zip");
    let (client, _) = mock_client();
    let done = client
        .bulk_download_to_file("WIKI", &target, Params::new())
        .await
        .unwrap();
    assert_eq!(done.path, target);
    assert!(target.is_file());

    let missing = dir.path().join("nope.zip");
    let err = client
        .bulk_download_to_file("NOPE", &missing, Params::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!missing.exists());

    let err = client
        .bulk_download_to_file("", dir.path(), Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DataLinkError::InvalidArg(_)));
}
