//! Paginated row source
//!
//! Drives repeated page fetches into one lazy row sequence. The source
//! is a pull-based state machine (`Start → Draining → Done`, `Failed`
//! reachable from any state): the next physical fetch is only issued
//! once the consumer has drained the buffered page, so downstream
//! consumption rate bounds upstream fetch rate. Dropping the stream
//! abandons any in-flight fetch and issues no further ones.
//!
//! Header injection: the first page that yields at least one row has
//! its column list prepended to the emitted sequence, exactly once. A
//! result with zero rows across all pages emits nothing, header
//! included.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use tracing::debug;

use crate::api::decode::Row;
use crate::api::errors::{QueryError, QueryResult};

/// One decoded page of a paginated result
#[derive(Debug, Clone)]
pub struct Page<C> {
    /// Column names; empty when the page carries no rows
    pub columns: Vec<String>,
    /// Normalized data rows
    pub rows: Vec<Row>,
    /// Cursor for the next page, if any
    pub next: Option<C>,
}

/// Fetches one physical page per call.
///
/// Implementations are owned by a single source instance; the cursor
/// type carries whatever continuation state the endpoint needs.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Continuation cursor threaded between pages
    type Cursor: Send + Sync;

    /// Fetches the first page (`None`) or the page at `cursor`.
    async fn fetch(&self, cursor: Option<Self::Cursor>) -> QueryResult<Page<Self::Cursor>>;
}

enum SourceState<C> {
    /// No page fetched yet
    Start,
    /// Delivering buffered rows; `next` drives the following fetch
    Draining {
        rows: VecDeque<Row>,
        next: Option<C>,
    },
    /// Failure pending delivery; buffered rows were already drained
    Failed(QueryError),
    /// Sequence exhausted
    Done,
}

struct PageSource<F: PageFetcher> {
    fetcher: F,
    state: SourceState<F::Cursor>,
    header_emitted: bool,
}

impl<F: PageFetcher> PageSource<F> {
    async fn next_item(&mut self) -> Option<QueryResult<Row>> {
        loop {
            match std::mem::replace(&mut self.state, SourceState::Done) {
                SourceState::Start => self.advance(None).await,
                SourceState::Draining { mut rows, next } => {
                    if let Some(row) = rows.pop_front() {
                        self.state = SourceState::Draining { rows, next };
                        return Some(Ok(row));
                    }
                    match next {
                        Some(cursor) => self.advance(Some(cursor)).await,
                        // State is already Done
                        None => return None,
                    }
                }
                // State is already Done, so the failure surfaces once
                SourceState::Failed(err) => return Some(Err(err)),
                SourceState::Done => return None,
            }
        }
    }

    /// Fetches one page and rebuilds the draining state.
    async fn advance(&mut self, cursor: Option<F::Cursor>) {
        match self.fetcher.fetch(cursor).await {
            Ok(page) => {
                debug!(
                    rows = page.rows.len(),
                    has_next = page.next.is_some(),
                    "page fetched"
                );
                let mut rows: VecDeque<Row> = page.rows.into();
                if !self.header_emitted && !rows.is_empty() {
                    self.header_emitted = true;
                    rows.push_front(page.columns.into_iter().map(Some).collect());
                }
                self.state = SourceState::Draining {
                    rows,
                    next: page.next,
                };
            }
            Err(err) => {
                debug!(error = %err, "page fetch failed");
                self.state = SourceState::Failed(err);
            }
        }
    }
}

/// Builds the lazy row stream over a page fetcher.
///
/// Rows already buffered from earlier pages are delivered before any
/// later fetch failure is surfaced, so partial results stay visible.
pub fn row_stream<F>(fetcher: F) -> impl Stream<Item = QueryResult<Row>>
where
    F: PageFetcher,
{
    let source = PageSource {
        fetcher,
        state: SourceState::Start,
        header_emitted: false,
    };
    stream::unfold(source, |mut source| async move {
        source.next_item().await.map(|item| (item, source))
    })
}
