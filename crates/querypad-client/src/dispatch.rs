//! Debounced search dispatch.
//!
//! Every keystroke in the lookup box calls [`Dispatcher::schedule`]. Only one
//! task is alive at a time: scheduling aborts the previous one whether it is
//! still sleeping out the quiet period or already waiting on the server. Each
//! task is tagged with a sequence number so a completion that slipped into the
//! channel before its task was aborted can still be recognised as stale.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::error::Result;
use crate::source::SuggestionSource;

/// Completion of one dispatched search.
#[derive(Debug)]
pub struct SearchOutcome {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<String>>,
}

pub struct Dispatcher<E> {
    source: Arc<dyn SuggestionSource>,
    delay: Duration,
    tx: UnboundedSender<E>,
    pending: Option<JoinHandle<()>>,
    seq: u64,
}

impl<E> Dispatcher<E>
where
    E: From<SearchOutcome> + Send + 'static,
{
    pub fn new(source: Arc<dyn SuggestionSource>, delay: Duration, tx: UnboundedSender<E>) -> Self {
        Self {
            source,
            delay,
            tx,
            pending: None,
            seq: 0,
        }
    }

    /// Dispatch `query` once the quiet period elapses without another call.
    pub fn schedule(&mut self, query: impl Into<String>) -> u64 {
        self.spawn(query.into(), self.delay)
    }

    /// Dispatch `query` right away, superseding anything pending.
    pub fn dispatch_now(&mut self, query: impl Into<String>) -> u64 {
        self.spawn(query.into(), Duration::ZERO)
    }

    /// Drop the pending task, if any. Completions already queued become stale.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.seq += 1;
    }

    /// Whether `seq` belongs to the most recently scheduled task.
    pub fn is_current(&self, seq: u64) -> bool {
        self.pending.is_some() && seq == self.seq
    }

    /// Mark the current task as delivered.
    pub fn complete(&mut self, seq: u64) {
        if seq == self.seq {
            self.pending = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn spawn(&mut self, query: String, delay: Duration) -> u64 {
        self.abort_pending();
        self.seq += 1;
        let seq = self.seq;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            debug!(seq, query = %query, "dispatching search");
            let result = source.suggest(&query).await;
            let _ = tx.send(E::from(SearchOutcome { seq, query, result }));
        }));

        seq
    }
}

impl<E> Drop for Dispatcher<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
