use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::error;

/// Count of submitted activation requests not yet fully handled.
///
/// `submit` increments before enqueueing; the worker that finishes a request decrements
/// through a [`PendingGuard`]. [`PendingCounter::wait`] blocks until the count is zero.
#[derive(Debug, Default)]
pub struct PendingCounter {
    count: Mutex<usize>,
    zero: Condvar,
}

impl PendingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn increment(&self) {
        *self.lock() += 1;
    }

    pub fn decrement(&self) {
        let mut count = self.lock();
        if *count == 0 {
            // more decrements than increments means a request was counted twice
            error!("pending counter decremented below zero");
            return;
        }
        *count -= 1;
        if *count == 0 {
            self.zero.notify_all();
        }
    }

    /// Decrements once when the returned guard goes out of scope.
    pub fn guard(&self) -> PendingGuard<'_> {
        PendingGuard { counter: self }
    }

    pub fn get(&self) -> usize {
        *self.lock()
    }

    pub fn wait(&self) {
        let count = self.lock();
        let _count = self
            .zero
            .wait_while(count, |count| *count > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Returns true if the count reached zero within `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.lock();
        while *count > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            count = self
                .zero
                .wait_timeout(count, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

/// Scope guard releasing one pending request.
#[derive(Debug)]
pub struct PendingGuard<'a> {
    counter: &'a PendingCounter,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.counter.decrement();
    }
}
