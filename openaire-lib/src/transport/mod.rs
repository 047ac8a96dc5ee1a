//! Transport abstraction used by the pagination engine.
//!
//! The engine never builds HTTP requests itself: it hands a [`QuerySpec`] to
//! a [`Transport`] and classifies the [`TransportError`] that comes back.

mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::query::PageResult;
use crate::api::query::QuerySpec;
use crate::error::TransportError;

pub use http::HttpTransport;

/// Performs page fetches for the pagination engine.
///
/// `open` and `release` bracket a page sequence. The engine guarantees that
/// every `open` is matched by exactly one `release`, on every exit path,
/// including a caller dropping the sequence early.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the page described by `spec`.
    async fn send(&self, spec: &QuerySpec) -> Result<PageResult, TransportError>;

    /// Issues an unstructured GET against `endpoint` and returns the JSON body.
    async fn get_raw(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, TransportError> {
        let _ = params;
        Err(TransportError::permanent(format!(
            "raw queries are not supported by this transport ({endpoint})"
        )))
    }

    /// Called when a page sequence starts.
    fn open(&self) {}

    /// Called once when a page sequence ends.
    fn release(&self) {}
}

/// Holds a transport open for the lifetime of a page sequence.
///
/// Releasing is idempotent, and dropping an unreleased lease releases it.
pub(crate) struct Lease {
    transport: Arc<dyn Transport>,
    released: bool,
}

impl Lease {
    pub(crate) fn acquire(transport: Arc<dyn Transport>) -> Self {
        transport.open();
        Self {
            transport,
            released: false,
        }
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.transport.release();
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.release();
    }
}
