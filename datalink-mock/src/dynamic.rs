use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use datalink_core::{ApiRequest, ApiResponse, DataLinkError, Transport};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::fixtures;

/// Instruction for how a request to a given path should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the provided response immediately.
    Return(ApiResponse),
    /// Fail immediately with the provided error (no response received).
    Fail(DataLinkError),
    /// Hang indefinitely (simulate a stalled connection).
    Hang,
}

impl MockBehavior {
    /// 200 response with a JSON body.
    #[must_use]
    pub fn json(body: &Value) -> Self {
        Self::Return(ApiResponse::ok(body))
    }

    /// Error response with a provider code.
    #[must_use]
    pub fn error(status: u16, code: &str, message: &str) -> Self {
        Self::Return(fixtures::errors::error_response(status, code, message))
    }
}

#[derive(Default)]
struct InternalState {
    // The last behavior of each queue is sticky.
    rules: HashMap<String, VecDeque<MockBehavior>>,
    requests: Vec<ApiRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Queue a behavior for requests to `path`.
    ///
    /// Behaviors are consumed in order; the last one keeps answering.
    pub async fn push(&self, path: &str, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard
            .rules
            .entry(path.trim_matches('/').to_string())
            .or_default()
            .push_back(behavior);
    }

    /// Replace every queued behavior for `path` with one.
    pub async fn set(&self, path: &str, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard
            .rules
            .insert(path.trim_matches('/').to_string(), VecDeque::from([behavior]));
    }

    /// Return a copy of the request log.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Requests whose path equals `path`.
    pub async fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        let path = path.trim_matches('/');
        self.state
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.path.trim_matches('/') == path)
            .cloned()
            .collect()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.requests.clear();
    }
}

/// A transport that defers all behavior to an external controller.
///
/// Paths with no scripted behavior answer 404 `QECx02`.
pub struct DynamicMockTransport {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockTransport {
    /// Create a new dynamic mock transport and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn Transport>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn Transport>, controller)
    }
}

#[async_trait]
impl Transport for DynamicMockTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DataLinkError> {
        // Take the behavior without holding the lock across the hang.
        let behavior = {
            let mut guard = self.state.lock().await;
            let key = request.path.trim_matches('/').to_string();
            guard.requests.push(request);
            match guard.rules.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        match behavior {
            Some(MockBehavior::Return(response)) => Ok(response),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Ok(fixtures::errors::not_found()),
        }
    }
}
