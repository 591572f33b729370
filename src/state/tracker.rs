//! Completion tracking for a crawl batch
//!
//! The tracker counts requests that have been dispatched but have not reached
//! a terminal outcome. A retry dispatches its resubmission before resolving
//! the failed attempt, so the count only reaches zero once every URL is done.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Counts outstanding requests and lets callers wait for zero
#[derive(Debug)]
pub struct CompletionTracker {
    outstanding: watch::Sender<usize>,
    dispatched: AtomicU64,
}

impl CompletionTracker {
    pub fn new() -> Self {
        let (outstanding, _) = watch::channel(0);
        Self {
            outstanding,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Records one dispatched request (a first attempt or a retry)
    pub fn dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        self.outstanding.send_modify(|count| *count += 1);
    }

    /// Records that one dispatched request reached a terminal outcome
    pub fn resolve(&self) {
        self.outstanding.send_modify(|count| {
            debug_assert!(*count > 0, "resolve without matching dispatch");
            *count = count.saturating_sub(1);
        });
    }

    /// Requests dispatched but not yet resolved
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Total requests dispatched so far, retries included
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn is_done(&self) -> bool {
        self.outstanding() == 0
    }

    /// Blocks until every dispatched request has resolved
    ///
    /// Returns immediately when nothing is outstanding, including when
    /// nothing was ever dispatched.
    pub async fn wait(&self) {
        let mut rx = self.outstanding.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}
