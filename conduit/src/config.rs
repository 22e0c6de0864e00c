use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProcessorError;

pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONFIG_PREFIX: &str = "jobs.pipelines";
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "conduit-worker-";

/// Configuration for a [`Processor`](crate::Processor) and the [`Activator`](crate::Activator)
/// built on top of it.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use conduit::ProcessorConfig;
///
/// let config: ProcessorConfig = serde_json::from_str(r#"{ "worker_count": 4 }"#).unwrap();
/// assert_eq!(config.worker_count, 4);
/// assert_eq!(config.queue_capacity, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Number of worker threads constructing and running drivers.
    pub worker_count: usize,

    /// Pending activation requests held before `submit` blocks.
    pub queue_capacity: usize,

    /// Seconds a pipeline marked for consumption may run during activation.
    pub run_timeout: u64,

    /// Prefix of the configuration key handed to constructors (`<prefix>.<pipeline>`).
    pub config_prefix: String,

    pub thread_name_prefix: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            run_timeout: DEFAULT_RUN_TIMEOUT_SECS,
            config_prefix: DEFAULT_CONFIG_PREFIX.to_string(),
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl ProcessorConfig {
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_run_timeout(mut self, seconds: u64) -> Self {
        self.run_timeout = seconds;
        self
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout)
    }

    /// Configuration key for `pipeline` under [`Self::config_prefix`].
    pub fn config_key(&self, pipeline: &str) -> String {
        if self.config_prefix.is_empty() {
            pipeline.to_string()
        } else {
            format!("{}.{}", self.config_prefix, pipeline)
        }
    }

    pub fn validate(&self) -> Result<(), ProcessorError> {
        if self.worker_count == 0 {
            return Err(ProcessorError::InvalidConfig("worker_count must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(ProcessorError::InvalidConfig("queue_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}
