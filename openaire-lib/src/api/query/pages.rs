//! Lazy page sequence.

use std::sync::Arc;

use futures::Stream;
use log::debug;

use crate::error::Error;
use crate::retry::RetryConfig;
use crate::transport::Lease;
use crate::transport::Transport;

use super::engine::Pager;
use super::engine::PagerState;
use super::page::PageResult;
use super::spec::QuerySpec;

/// Forward-only, pull-based sequence of result pages.
///
/// Each call to [`next`](Self::next) issues at most one request; nothing is
/// fetched in the background. The transport is held open from creation until
/// the sequence is exhausted, fails, is [closed](Self::close), or is dropped,
/// whichever comes first, and is released exactly once.
///
/// Once the sequence has ended, further calls to `next` yield
/// [`Error::IterationClosed`].
///
/// # Example
///
/// ```ignore
/// let mut pages = client.research_products()
///     .search("research software metadata")?
///     .iterate_pages();
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     for record in page.items() {
///         println!("{}", record["mainTitle"]);
///     }
/// }
/// ```
pub struct Pages {
    pager: Pager,
    lease: Option<Lease>,
    ended: bool,
}

impl Pages {
    pub(crate) fn new(spec: QuerySpec, retry: RetryConfig, transport: Arc<dyn Transport>) -> Self {
        debug!("Opening page sequence for {}", spec.to_query_string());
        Self {
            pager: Pager::new(spec, retry),
            lease: Some(Lease::acquire(transport)),
            ended: false,
        }
    }

    /// Fetches the next page.
    ///
    /// Returns `None` when all pages have been consumed.
    pub async fn next(&mut self) -> Option<Result<PageResult, Error>> {
        if self.ended {
            return Some(Err(Error::IterationClosed));
        }
        let Some(lease) = self.lease.as_ref() else {
            // Released after the final page; this call reports the end.
            self.ended = true;
            return None;
        };
        if self.pager.state().is_terminal() {
            self.close();
            return None;
        }

        match self.pager.advance(lease.transport()).await {
            Ok(Some(page)) => {
                if self.pager.state().is_terminal() {
                    self.release();
                }
                Some(Ok(page))
            }
            Ok(None) => {
                self.close();
                None
            }
            Err(err) => {
                self.close();
                Some(Err(err))
            }
        }
    }

    /// Ends the sequence early and releases the transport.
    ///
    /// Calling `close` more than once has no further effect.
    pub fn close(&mut self) {
        self.release();
        self.ended = true;
    }

    /// Returns `true` once the sequence has ended or been closed.
    pub fn is_closed(&self) -> bool {
        self.ended
    }

    /// Returns the current position of the cursor chain.
    pub fn state(&self) -> &PagerState {
        self.pager.state()
    }

    /// Converts the sequence into a [`Stream`] of pages.
    ///
    /// The stream ends after the last page or after the first error. Dropping
    /// it releases the transport.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<PageResult, Error>> + Send {
        async_stream::stream! {
            while let Some(page) = self.next().await {
                let failed = page.is_err();
                yield page;
                if failed {
                    break;
                }
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut lease) = self.lease.take() {
            lease.release();
        }
    }
}
