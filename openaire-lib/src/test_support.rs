//! Scripted transport for engine and builder tests.

use std::collections::VecDeque;
use std::ops::Range;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::api::query::PageResult;
use crate::api::query::QuerySpec;
use crate::error::TransportError;
use crate::retry::RetryConfig;
use crate::transport::Transport;
use crate::OpenAireClient;

/// Replays a fixed list of responses and records every request.
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<PageResult, TransportError>>>,
    requests: Mutex<Vec<QuerySpec>>,
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new(
        responses: impl IntoIterator<Item = Result<PageResult, TransportError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            opened: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<QuerySpec> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, spec: &QuerySpec) -> Result<PageResult, TransportError> {
        self.requests.lock().unwrap().push(spec.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::permanent("script exhausted")))
    }

    fn open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A page of `{"id": n}` records with an optional next cursor.
pub(crate) fn page(ids: Range<u32>, next_cursor: Option<&str>) -> PageResult {
    let items = ids.map(|id| json!({ "id": id })).collect();
    let page = PageResult::new(items).with_total_found(1000);
    match next_cursor {
        Some(cursor) => page.with_next_cursor(cursor),
        None => page,
    }
}

/// Retry policy with the default ceiling and no waiting.
pub(crate) fn fast_retry() -> RetryConfig {
    RetryConfig::default()
        .initial_delay(Duration::ZERO)
        .jitter(false)
}

/// A client wired to `transport`.
pub(crate) fn client(transport: &Arc<ScriptedTransport>) -> OpenAireClient {
    OpenAireClient::builder()
        .transport(transport.clone())
        .retry(fast_retry())
        .build()
        .unwrap()
}
