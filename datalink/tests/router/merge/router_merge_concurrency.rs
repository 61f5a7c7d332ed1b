use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use datalink::{ApiRequest, ApiResponse, DataLinkError, FetchStrategy, Params, Selector, Transport};
use datalink_mock::MockTransport;
use tokio::sync::Barrier;

use crate::helpers::{AAPL, MSFT, builder, mock_client, mock_client_with};

/// Holds every request until `n` of them are in flight at once.
struct Gated {
    barrier: Barrier,
    inner: MockTransport,
}

#[async_trait]
impl Transport for Gated {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DataLinkError> {
        self.barrier.wait().await;
        self.inner.send(request).await
    }
}

fn gated_client(strategy: FetchStrategy) -> datalink::DataLink {
    let transport = Arc::new(Gated {
        barrier: Barrier::new(2),
        inner: MockTransport::new(),
    });
    builder()
        .fetch_strategy(strategy)
        .transport(transport)
        .build()
        .unwrap()
}

fn pair() -> Selector {
    Selector::parse_many(&[AAPL, MSFT]).unwrap()
}

#[tokio::test]
async fn concurrent_strategy_issues_requests_together() {
    let client = gated_client(FetchStrategy::Concurrent);
    let res = tokio::time::timeout(Duration::from_secs(5), client.get(pair(), Params::new()))
        .await
        .expect("both requests were in flight together")
        .unwrap();
    assert_eq!(res.columns()[1], "WIKI/AAPL - column.1");
    assert_eq!(res.columns()[4], "WIKI/MSFT - column.1");
}

#[tokio::test]
async fn sequential_strategy_sends_one_at_a_time() {
    let client = gated_client(FetchStrategy::Sequential);
    let outcome =
        tokio::time::timeout(Duration::from_millis(200), client.get(pair(), Params::new())).await;
    assert!(outcome.is_err(), "second request must wait for the first");
}

#[tokio::test]
async fn strategies_produce_identical_results() {
    let (seq, _) = mock_client();
    let (conc, transport) =
        mock_client_with(builder().fetch_strategy(FetchStrategy::Concurrent));

    let a = seq.get(pair(), Params::new()).await.unwrap();
    let b = conc.get(pair(), Params::new()).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(transport.request_count().await, 2);
}
