//! Search input debouncing.
//!
//! A burst of keystrokes produces exactly one query: each [`SearchDebouncer::schedule`]
//! call supersedes the previous timer, and only a timer that survives its full
//! quiet period fires. Once fired, the query runs as a detached task and can no
//! longer be retracted.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Quiet period used by the storefront search box.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct PendingTimer {
    handle: JoinHandle<()>,
    query: String,
}

/// Holds at most one pending search timer.
///
/// Dropping the debouncer cancels the pending timer.
#[derive(Debug)]
pub struct SearchDebouncer {
    quiet_period: Duration,
    pending: Option<PendingTimer>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl SearchDebouncer {
    /// Create a debouncer with nothing pending.
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Time input must stay quiet before a query fires.
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Schedule `fire(query)` to run after the quiet period, cancelling any
    /// timer that has not fired yet.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F, Fut>(&mut self, query: impl Into<String>, fire: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.cancel() {
            trace!("Superseded pending search");
        }

        let query = query.into();
        let fired_query = query.clone();
        let delay = self.quiet_period;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached: aborting the timer handle from here on has no effect.
            tokio::spawn(fire(fired_query));
        });

        self.pending = Some(PendingTimer { handle, query });
    }

    /// Cancel the pending timer, if any.
    ///
    /// Returns `true` if a timer was still waiting and has been cancelled.
    /// A query that has already fired keeps running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) if !timer.handle.is_finished() => {
                timer.handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a timer is waiting out its quiet period.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    /// Text of the query that will fire if nothing else arrives.
    #[must_use]
    pub fn pending_query(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .filter(|timer| !timer.handle.is_finished())
            .map(|timer| timer.query.as_str())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
