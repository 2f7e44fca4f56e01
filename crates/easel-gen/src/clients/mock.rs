//! Mock client for testing
//!
//! Produces deterministic payloads without any network calls and counts
//! invocations so tests can assert on call budgets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::client::{AssetClient, ErrorKind, GenPayload, GenRequest, InvokeError, RequestKind};

/// Shared invocation counter handle
#[derive(Clone)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A client that succeeds, always fails, or fails only for prompts
/// containing a marker substring. Counts every invocation.
pub struct MockClient {
    model: String,
    failure: Option<ErrorKind>,
    failure_marker: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockClient {
    pub fn succeeding(model: &str) -> Self {
        Self {
            model: model.to_string(),
            failure: None,
            failure_marker: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(model: &str, kind: ErrorKind) -> Self {
        Self {
            model: model.to_string(),
            failure: Some(kind),
            failure_marker: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail only requests whose prompt contains `marker`
    pub fn failing_on_marker(model: &str, marker: &str, kind: ErrorKind) -> Self {
        Self {
            model: model.to_string(),
            failure: Some(kind),
            failure_marker: Some(marker.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> CallCounter {
        CallCounter(self.calls.clone())
    }
}

impl AssetClient for MockClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn invoke(&self, request: &GenRequest) -> Result<GenPayload, InvokeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let should_fail = match &self.failure_marker {
            Some(marker) => request.prompt.contains(marker),
            None => true,
        };

        match self.failure.filter(|_| should_fail) {
            Some(ErrorKind::Recoverable) => {
                Err(InvokeError::recoverable(Some(404), "mock model not found"))
            }
            Some(ErrorKind::Fatal) => Err(InvokeError::fatal(Some(400), "mock invalid request")),
            None => {
                let bytes = match &request.kind {
                    RequestKind::Image { .. } => {
                        format!("MOCK-PNG:{}", request.prompt).into_bytes()
                    }
                    RequestKind::Text => {
                        format!("{{\"translation\":{:?}}}", request.prompt).into_bytes()
                    }
                };
                Ok(GenPayload {
                    bytes,
                    model: self.model.clone(),
                })
            }
        }
    }
}
