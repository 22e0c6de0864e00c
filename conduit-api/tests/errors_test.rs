use conduit_api::errors::{ContextError, DriverError};
use std::error::Error;
use anyhow::anyhow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_error_display() {
        assert_eq!(ContextError::DeadlineExceeded.to_string(), "context deadline exceeded");
        assert_eq!(ContextError::Canceled.to_string(), "context canceled");
    }

    #[test]
    fn test_invalid_config_display() {
        let error = DriverError::InvalidConfig {
            key: "jobs.pipelines.emails".to_string(),
            reason: "missing queue".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid configuration for jobs.pipelines.emails: missing queue"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_connection_display() {
        let error = DriverError::Connection("broker unreachable".to_string());
        assert_eq!(error.to_string(), "connection failed: broker unreachable");
    }

    #[test]
    fn test_other_is_transparent() {
        let error = DriverError::from(anyhow!("connect refused"));
        assert_eq!(error.to_string(), "connect refused");
        assert!(!error.is_deadline_exceeded());
    }

    #[test]
    fn test_context_classification() {
        let deadline = DriverError::from(ContextError::DeadlineExceeded);
        assert!(deadline.is_deadline_exceeded());
        assert!(!deadline.is_canceled());
        assert_eq!(deadline.to_string(), "context deadline exceeded");

        let canceled = DriverError::from(ContextError::Canceled);
        assert!(canceled.is_canceled());
        assert!(!canceled.is_deadline_exceeded());
    }
}
