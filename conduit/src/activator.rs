//! # Batch Activation
//!
//! Drives a whole set of declared pipelines through a [`Processor`]: every pipeline is matched
//! to the constructor for its driver kind, submitted, and the batch is waited on as a unit.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let mut constructors = ConstructorRegistry::new();
//! constructors.register(Arc::new(AmqpConstructor::new()));
//!
//! let activator = Activator::new(ProcessorConfig::default(), constructors);
//! let drivers = activator.activate(pipelines, &consume, queue, commands)?;
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use conduit_api::{CommandSender, DriverConstructor, Pipeline, Queue};
use tracing::{debug, info};

use crate::config::ProcessorConfig;
use crate::error::{ActivationError, ProcessorError};
use crate::processor::{ActivationRequest, DriverRegistry, Processor};

/// Driver kind → constructor.
#[derive(Default, Clone)]
pub struct ConstructorRegistry {
    constructors: HashMap<String, Arc<dyn DriverConstructor>>,
}

impl fmt::Debug for ConstructorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under its [`DriverConstructor::kind`], returning the one it
    /// replaced.
    pub fn register(&mut self, constructor: Arc<dyn DriverConstructor>) -> Option<Arc<dyn DriverConstructor>> {
        self.constructors.insert(constructor.kind().to_string(), constructor)
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn DriverConstructor>> {
        self.constructors.get(kind).cloned()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.constructors.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

#[derive(Debug)]
pub struct Activator {
    config: ProcessorConfig,
    constructors: ConstructorRegistry,
}

impl Activator {
    pub fn new(config: ProcessorConfig, constructors: ConstructorRegistry) -> Self {
        Self { config, constructors }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn constructors(&self) -> &ConstructorRegistry {
        &self.constructors
    }

    /// Builds a driver for every pipeline and runs those named in `consume`.
    ///
    /// Each pipeline is handed its configuration key (`<config_prefix>.<name>`) and the
    /// configured run timeout. Pipeline names must be unique: repeats are reported as
    /// [`ActivationError::DuplicatePipeline`] and only the first declaration is built.
    ///
    /// Returns the populated registry, or [`ProcessorError::ActivationFailed`] with every
    /// failure when at least one pipeline could not be activated.
    pub fn activate(
        &self,
        pipelines: impl IntoIterator<Item = Pipeline>,
        consume: &HashSet<String>,
        queue: Arc<dyn Queue>,
        commands: CommandSender,
    ) -> Result<Arc<DriverRegistry>, ProcessorError> {
        let registry = Arc::new(DriverRegistry::new());
        let processor = Processor::new(&self.config, registry.clone(), consume.clone())?;

        let mut rejected = Vec::new();
        let mut seen = HashSet::new();
        let mut submitted = 0usize;

        for pipeline in pipelines {
            if !seen.insert(pipeline.name().to_string()) {
                rejected.push(Arc::new(ActivationError::DuplicatePipeline {
                    pipeline: pipeline.name().to_string(),
                }));
                continue;
            }

            let Some(constructor) = self.constructors.get(pipeline.driver()) else {
                rejected.push(Arc::new(ActivationError::UnknownDriver {
                    pipeline: pipeline.name().to_string(),
                    driver: pipeline.driver().to_string(),
                }));
                continue;
            };

            let config_key = self.config.config_key(pipeline.name());
            debug!(pipeline = %pipeline.name(), driver = %pipeline.driver(), config_key = %config_key, "submitting pipeline");
            processor.submit(ActivationRequest::new(
                constructor,
                pipeline,
                queue.clone(),
                commands.clone(),
                config_key,
                self.config.run_timeout,
            ))?;
            submitted += 1;
        }

        processor.wait();
        let mut errors = rejected;
        errors.extend(processor.errors());
        processor.shutdown()?;

        info!(
            submitted,
            registered = registry.len(),
            failed = errors.len(),
            "pipeline activation finished"
        );

        if errors.is_empty() {
            Ok(registry)
        } else {
            Err(ProcessorError::ActivationFailed(errors))
        }
    }
}
