use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use conduit_api::{CommandSender, DriverConstructor, Pipeline, Queue};
use uuid::Uuid;

/// One unit of work for the [`Processor`](super::Processor): build the driver for `pipeline`
/// and, if the pipeline is marked for consumption, run it for up to `timeout`.
pub struct ActivationRequest {
    pub(crate) id: Uuid,
    pub(crate) constructor: Arc<dyn DriverConstructor>,
    pub(crate) pipeline: Pipeline,
    pub(crate) queue: Arc<dyn Queue>,
    pub(crate) commands: CommandSender,
    pub(crate) config_key: String,
    pub(crate) timeout: Duration,
}

impl ActivationRequest {
    /// `timeout_secs` bounds the run call; zero means the run starts past its deadline.
    pub fn new(
        constructor: Arc<dyn DriverConstructor>,
        pipeline: Pipeline,
        queue: Arc<dyn Queue>,
        commands: CommandSender,
        config_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            constructor,
            pipeline,
            queue,
            commands,
            config_key: config_key.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn config_key(&self) -> &str {
        &self.config_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ActivationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationRequest")
            .field("id", &self.id)
            .field("pipeline", &self.pipeline.name())
            .field("driver", &self.pipeline.driver())
            .field("config_key", &self.config_key)
            .field("timeout", &self.timeout)
            .finish()
    }
}
