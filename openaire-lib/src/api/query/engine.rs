//! Cursor pagination state machine.

use log::debug;
use log::info;
use log::warn;

use crate::error::Error;
use crate::error::TransportError;
use crate::retry::RetryConfig;
use crate::transport::Transport;

use super::page::PageResult;
use super::spec::CursorToken;
use super::spec::QuerySpec;

/// Position of a cursor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing fetched yet.
    Idle,
    /// The service issued this cursor for the next page.
    Advancing(CursorToken),
    /// The service signalled there are no further pages.
    Exhausted,
    /// A page fetch failed terminally.
    Failed,
}

impl PagerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PagerState::Exhausted | PagerState::Failed)
    }
}

/// Drives one query through its cursor chain, one page per call.
///
/// Each request spec is derived from the original spec plus the latest
/// cursor, so a cursor is never attached to filters it was not issued for.
#[derive(Debug)]
pub(crate) struct Pager {
    spec: QuerySpec,
    retry: RetryConfig,
    state: PagerState,
}

impl Pager {
    pub(crate) fn new(spec: QuerySpec, retry: RetryConfig) -> Self {
        Self {
            spec,
            retry,
            state: PagerState::Idle,
        }
    }

    pub(crate) fn state(&self) -> &PagerState {
        &self.state
    }

    /// Fetches the next page.
    ///
    /// Returns `Ok(None)` once the chain is in a terminal state; no request is
    /// issued in that case.
    pub(crate) async fn advance(
        &mut self,
        transport: &dyn Transport,
    ) -> Result<Option<PageResult>, Error> {
        let request = match &self.state {
            PagerState::Idle => self.spec.clone(),
            PagerState::Advancing(cursor) => self.spec.with_cursor(cursor.clone()),
            PagerState::Exhausted | PagerState::Failed => return Ok(None),
        };

        match send_with_retry(transport, &request, &self.retry).await {
            Ok(page) => {
                self.state = match page.next_cursor() {
                    Some(next) if request.cursor() == Some(next) => {
                        warn!(
                            "Service repeated cursor for {}; stopping",
                            request.entity()
                        );
                        PagerState::Exhausted
                    }
                    Some(next) if !page.is_empty() => PagerState::Advancing(next.clone()),
                    _ => {
                        info!("No further pages for {}", request.entity());
                        PagerState::Exhausted
                    }
                };
                Ok(Some(page))
            }
            Err(source) => {
                self.state = PagerState::Failed;
                Err(Error::Transport {
                    entity: request.entity(),
                    query: request.to_query_string(),
                    source,
                })
            }
        }
    }
}

/// Sends `spec`, retrying transient failures with exponential backoff.
pub(crate) async fn send_with_retry(
    transport: &dyn Transport,
    spec: &QuerySpec,
    retry: &RetryConfig,
) -> Result<PageResult, TransportError> {
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!(
            "Fetching {} (attempt {attempt}/{max_attempts})",
            spec.to_query_string()
        );
        match transport.send(spec).await {
            Ok(page) => {
                debug!(
                    "Received {} of {} records, next cursor: {:?}",
                    page.len(),
                    page.total_found(),
                    page.next_cursor().map(CursorToken::as_str)
                );
                return Ok(page);
            }
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = retry.delay_for(attempt);
                warn!("Transient failure on {}: {err}; retrying in {delay:?}", spec.entity());
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
