use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ActivationError;

/// Append-only list of activation failures, in the order workers recorded them.
#[derive(Debug, Default)]
pub struct ErrorLog {
    errors: Mutex<Vec<Arc<ActivationError>>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, error: ActivationError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(error));
    }

    /// Copy of the log; later appends do not show up in it.
    pub fn snapshot(&self) -> Vec<Arc<ActivationError>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
