//! # Driver Error Types
//!
//! Errors returned across the driver boundary. A driver constructor or a driver run reports one
//! of these; the activation pool wraps it with the pipeline it belongs to.
//!
//! ## Usage Example
//!
//! ```rust
//! use conduit_api::errors::{ContextError, DriverError};
//!
//! let err = DriverError::from(anyhow::anyhow!("connect refused"));
//! assert_eq!(err.to_string(), "connect refused");
//!
//! let err = DriverError::from(ContextError::DeadlineExceeded);
//! assert!(err.is_deadline_exceeded());
//! ```

use thiserror::Error;

/// Why a [`RunContext`](crate::RunContext) is done.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context's deadline elapsed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The owner released the context before the deadline.
    #[error("context canceled")]
    Canceled,
}

/// Error produced by a driver constructor or by a running driver.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The configuration under `key` could not be used to build the driver.
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// The backing queue broker could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The run context ended the call.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Catch-all for driver specific failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DriverError {
    /// Returns true when the error is the run context's deadline elapsing.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, DriverError::Context(ContextError::DeadlineExceeded))
    }

    /// Returns true when the error is the run context being released early.
    pub fn is_canceled(&self) -> bool {
        matches!(self, DriverError::Context(ContextError::Canceled))
    }
}
