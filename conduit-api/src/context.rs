//! # Run Context
//!
//! A [`RunContext`] bounds a blocking [`Driver::run`](crate::Driver::run) call. It is done when
//! its deadline elapses or when the owner releases it through the paired [`CancelGuard`],
//! whichever happens first.
//!
//! ## Implementation Details
//! Cancellation is a zero-message flume channel: the guard owns the only sender, so dropping
//! the guard disconnects every clone of the context at once. Drivers block on the context with
//! [`RunContext::done`], [`RunContext::sleep`] or [`RunContext::recv`], all of which wake on
//! whichever of deadline / cancel / message arrives first.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError, Selector, Sender};

use crate::errors::ContextError;

/// Deadline-bound, cancellable execution context handed to a running driver.
#[derive(Debug, Clone)]
pub struct RunContext {
    deadline: Option<Instant>,
    canceled_at: Arc<OnceLock<Instant>>,
    done: Receiver<()>,
}

/// Releases the paired [`RunContext`] when dropped or when [`CancelGuard::cancel`] is called.
#[derive(Debug)]
pub struct CancelGuard {
    canceled_at: Arc<OnceLock<Instant>>,
    _release: Sender<()>,
}

impl CancelGuard {
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        // stamped before `_release` drops, so a disconnected context always sees it
        let _ = self.canceled_at.set(Instant::now());
    }
}

impl RunContext {
    /// Context that is done `timeout` from now, or earlier if the guard is released.
    ///
    /// A zero timeout yields a context that is already past its deadline. A timeout too large
    /// to represent as an [`Instant`] yields a context without a deadline.
    pub fn with_timeout(timeout: Duration) -> (Self, CancelGuard) {
        Self::with_deadline(Instant::now().checked_add(timeout))
    }

    /// Context with no deadline; only the guard ends it.
    pub fn background() -> (Self, CancelGuard) {
        Self::with_deadline(None)
    }

    fn with_deadline(deadline: Option<Instant>) -> (Self, CancelGuard) {
        let (release, done) = flume::bounded(0);
        let canceled_at = Arc::new(OnceLock::new());
        (
            Self { deadline, canceled_at: canceled_at.clone(), done },
            CancelGuard { canceled_at, _release: release },
        )
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline; `None` for a context without one.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Why the context is done, or `None` while it is still live.
    ///
    /// The cause is whichever of deadline and cancel happened first, and it does not change
    /// once reported.
    pub fn err(&self) -> Option<ContextError> {
        match (self.canceled_at.get(), self.deadline) {
            (Some(canceled), Some(deadline)) if deadline <= *canceled => {
                Some(ContextError::DeadlineExceeded)
            }
            (Some(_), _) => Some(ContextError::Canceled),
            (None, Some(deadline)) if Instant::now() >= deadline => {
                Some(ContextError::DeadlineExceeded)
            }
            (None, _) => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Blocks until the context is done and returns the cause.
    pub fn done(&self) -> ContextError {
        let fired = match self.deadline {
            Some(deadline) => match self.done.recv_deadline(deadline) {
                Err(RecvTimeoutError::Timeout) => ContextError::DeadlineExceeded,
                _ => ContextError::Canceled,
            },
            None => {
                let _ = self.done.recv();
                ContextError::Canceled
            }
        };
        self.err().unwrap_or(fired)
    }

    /// Sleeps for `duration`, returning early with the cause if the context ends first.
    pub fn sleep(&self, duration: Duration) -> Result<(), ContextError> {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let wake = Instant::now().checked_add(duration);
        let until = match (self.deadline, wake) {
            (Some(deadline), Some(wake)) => Some(deadline.min(wake)),
            (Some(deadline), None) => Some(deadline),
            (None, wake) => wake,
        };
        let outcome = match until {
            Some(until) => self.done.recv_deadline(until),
            None => self.done.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match outcome {
            Err(RecvTimeoutError::Timeout) => match self.err() {
                Some(err) => Err(err),
                None => Ok(()),
            },
            _ => Err(self.err().unwrap_or(ContextError::Canceled)),
        }
    }

    /// Receives from `rx` unless the context ends first.
    ///
    /// `Ok(None)` means `rx` was disconnected.
    pub fn recv<T>(&self, rx: &Receiver<T>) -> Result<Option<T>, ContextError> {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let selector = Selector::new()
            .recv(rx, |msg| Ok::<_, ContextError>(msg.ok()))
            .recv(&self.done, |_| Err(ContextError::Canceled));

        let received = match self.deadline {
            Some(deadline) => selector
                .wait_deadline(deadline)
                .unwrap_or(Err(ContextError::DeadlineExceeded)),
            None => selector.wait(),
        };
        received.map_err(|fired| self.err().unwrap_or(fired))
    }
}
