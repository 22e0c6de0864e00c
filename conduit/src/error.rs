use std::fmt;
use std::sync::Arc;

use conduit_api::DriverError;
use thiserror::Error;

/// Step of the activation algorithm a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Construct,
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Construct => f.write_str("construct"),
            Stage::Run => f.write_str("run"),
        }
    }
}

/// Failure of a single activation request.
///
/// `Construction` and `Run` display exactly as the driver error they carry so that callers
/// can match on the driver's own message; the pipeline is available through [`Self::pipeline`].
#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("{error}")]
    Construction {
        pipeline: String,
        driver: String,
        error: DriverError,
    },

    #[error("{error}")]
    Run {
        pipeline: String,
        driver: String,
        error: DriverError,
    },

    #[error("driver {driver} panicked during {stage} of pipeline {pipeline}: {message}")]
    Panicked {
        pipeline: String,
        driver: String,
        stage: Stage,
        message: String,
    },

    #[error("no constructor registered for driver {driver} (pipeline {pipeline})")]
    UnknownDriver { pipeline: String, driver: String },

    #[error("pipeline {pipeline} is declared more than once")]
    DuplicatePipeline { pipeline: String },
}

impl ActivationError {
    pub fn pipeline(&self) -> &str {
        match self {
            ActivationError::Construction { pipeline, .. }
            | ActivationError::Run { pipeline, .. }
            | ActivationError::Panicked { pipeline, .. }
            | ActivationError::UnknownDriver { pipeline, .. }
            | ActivationError::DuplicatePipeline { pipeline } => pipeline,
        }
    }

    /// Driver kind involved, when one is known.
    pub fn driver(&self) -> Option<&str> {
        match self {
            ActivationError::Construction { driver, .. }
            | ActivationError::Run { driver, .. }
            | ActivationError::Panicked { driver, .. }
            | ActivationError::UnknownDriver { driver, .. } => Some(driver),
            ActivationError::DuplicatePipeline { .. } => None,
        }
    }

    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            ActivationError::Construction { error, .. } | ActivationError::Run { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        self.driver_error().is_some_and(DriverError::is_deadline_exceeded)
    }
}

/// Errors from the processor itself, as opposed to a single pipeline.
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Processor is shut down")]
    ShutDown,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn worker thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),

    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("{} pipeline(s) failed to activate: {}", .0.len(), join_messages(.0))]
    ActivationFailed(Vec<Arc<ActivationError>>),
}

fn join_messages(errors: &[Arc<ActivationError>]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.pipeline(), e))
        .collect::<Vec<_>>()
        .join("; ")
}
