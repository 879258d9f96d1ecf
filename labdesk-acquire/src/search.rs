//! Debounced search with stale-response discard.
//!
//! [`SearchState`] is the pure bookkeeping: query text, results, busy/error
//! flags and the latest request token. [`SearchController`] drives it on tokio:
//! it owns the cancellable debounce timer and runs lookups as detached tasks
//! whose answers are applied only if their token is still the latest.

use crate::config::AcquireConfig;
use crate::error::AcquireError;
use crate::provider::SearchProvider;
use labdesk_model::SearchResultItem;
use labdesk_types::{ItemKey, SessionContext};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Monotonic identity of an issued lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn value(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// What a search field shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    pub busy: bool,
    pub error: bool,
}

/// What the driver has to do after a query change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    /// Blank query: state is already idle, nothing to schedule.
    Cleared,
    /// Schedule a lookup for this (trimmed) text.
    Pending(String),
}

/// Search field state without timers or I/O.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    snapshot: SearchSnapshot,
    latest: RequestToken,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &SearchSnapshot {
        &self.snapshot
    }

    /// The only token whose response will still be applied.
    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Records new query text. A blank query goes idle at once and
    /// invalidates any outstanding lookup.
    pub fn set_query(&mut self, text: &str) -> QueryChange {
        self.snapshot.query = text.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.invalidate();
            self.snapshot.results.clear();
            self.snapshot.error = false;
            QueryChange::Cleared
        } else {
            QueryChange::Pending(trimmed.to_string())
        }
    }

    /// The debounce timer fired: issue the next token and go busy.
    pub fn issue(&mut self) -> RequestToken {
        self.latest = self.latest.next();
        self.snapshot.busy = true;
        self.snapshot.error = false;
        self.latest
    }

    /// Applies a lookup outcome. Returns `false` (and changes nothing) when
    /// `token` is no longer the latest.
    pub fn apply(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<SearchResultItem>, AcquireError>,
    ) -> bool {
        if token != self.latest {
            return false;
        }
        match outcome {
            Ok(results) => {
                self.snapshot.results = results;
                self.snapshot.error = false;
            }
            Err(_) => {
                self.snapshot.results.clear();
                self.snapshot.error = true;
            }
        }
        self.snapshot.busy = false;
        true
    }

    /// Makes every outstanding token stale.
    pub fn invalidate(&mut self) {
        self.latest = self.latest.next();
        self.snapshot.busy = false;
    }

    /// Back to an empty, idle field. Outstanding lookups become stale.
    pub fn reset(&mut self) {
        self.invalidate();
        self.snapshot = SearchSnapshot::default();
    }
}

/// Debounced search bound to one provider.
///
/// Must be driven from within a Tokio runtime.
pub struct SearchController {
    ctx: SessionContext,
    provider: Arc<dyn SearchProvider>,
    debounce: Duration,
    request_timeout: Duration,
    state: Arc<watch::Sender<SearchState>>,
    timer: Option<JoinHandle<()>>,
}

impl SearchController {
    pub fn new(
        ctx: SessionContext,
        provider: Arc<dyn SearchProvider>,
        config: &AcquireConfig,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::new());
        Self {
            ctx,
            provider,
            debounce: config.debounce,
            request_timeout: config.request_timeout,
            state: Arc::new(state),
            timer: None,
        }
    }

    /// Replaces the query. Cancels the pending timer; a non-blank query
    /// schedules a fresh one.
    pub fn set_query(&mut self, text: &str) {
        self.cancel_timer();
        let mut change = QueryChange::Cleared;
        self.state.send_modify(|state| change = state.set_query(text));

        match change {
            QueryChange::Cleared => debug!("Search cleared"),
            QueryChange::Pending(query) => {
                let task = LookupTask {
                    ctx: self.ctx.clone(),
                    provider: Arc::clone(&self.provider),
                    state: Arc::clone(&self.state),
                    query,
                    request_timeout: self.request_timeout,
                };
                let debounce = self.debounce;
                self.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(debounce).await;
                    task.issue();
                }));
            }
        }
    }

    /// Current field state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().snapshot().clone()
    }

    /// Change notifications for presentation layers.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Looks up a row of the current results.
    pub fn find_result(&self, key: &ItemKey) -> Option<SearchResultItem> {
        self.state
            .borrow()
            .snapshot()
            .results
            .iter()
            .find(|item| &item.key == key)
            .cloned()
    }

    /// Whether a debounce timer is still waiting to fire.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Cancels the timer, invalidates any in-flight lookup and clears the field.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.state.send_modify(SearchState::reset);
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_timer();
        self.state.send_modify(SearchState::invalidate);
    }
}

/// Everything a lookup needs once its timer has fired.
struct LookupTask {
    ctx: SessionContext,
    provider: Arc<dyn SearchProvider>,
    state: Arc<watch::Sender<SearchState>>,
    query: String,
    request_timeout: Duration,
}

impl LookupTask {
    /// Issues a token and detaches the request, so cancelling a later timer
    /// never cancels a lookup that is already on the wire.
    fn issue(self) {
        let mut token = RequestToken::default();
        self.state.send_modify(|state| token = state.issue());
        debug!("Issuing search #{} for {:?}", token.value(), self.query);
        tokio::spawn(self.run(token));
    }

    async fn run(self, token: RequestToken) {
        let outcome = match tokio::time::timeout(
            self.request_timeout,
            self.provider.search(&self.ctx, &self.query),
        )
        .await
        {
            Ok(Ok(results)) => Ok(results),
            Ok(Err(e)) => {
                warn!("Search #{} for {:?} failed: {}", token.value(), self.query, e);
                Err(AcquireError::from(e))
            }
            Err(_) => {
                warn!("Search #{} for {:?} timed out", token.value(), self.query);
                Err(AcquireError::Timeout)
            }
        };

        let applied = self
            .state
            .send_if_modified(|state| state.apply(token, outcome));
        if !applied {
            debug!("Discarded stale search #{} for {:?}", token.value(), self.query);
        }
    }
}
