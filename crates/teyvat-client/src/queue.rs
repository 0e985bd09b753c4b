//! Serial request queue
//!
//! Keeps at most one HTTP call of a client in flight. Waiters are served in
//! the order they arrived: tokio's mutex hands out the lock first-in
//! first-out, so dispatch order equals submission order.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::trace;

/// Single-flight FIFO queue shared by every call of a client.
#[derive(Debug, Default)]
pub struct RequestQueue {
  turn: Mutex<u64>,
  waiting: AtomicUsize,
}

impl RequestQueue {
  /// Empty queue
  pub fn new() -> Self {
    Self::default()
  }

  /// Run `task` once every earlier submission has finished.
  ///
  /// The task's own output is handed back to this caller, success or
  /// failure alike.
  pub async fn enqueue<F, Fut, T>(&self, task: F) -> T
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
  {
    let queued = self.waiting.fetch_add(1, Ordering::SeqCst) + 1;
    trace!(queued, "Request queued");

    let mut dispatched = self.turn.lock().await;
    self.waiting.fetch_sub(1, Ordering::SeqCst);
    *dispatched += 1;
    trace!(ticket = *dispatched, "Request dispatched");

    task().await
  }

  /// Submissions still waiting for their turn
  pub fn waiting(&self) -> usize {
    self.waiting.load(Ordering::SeqCst)
  }
}
