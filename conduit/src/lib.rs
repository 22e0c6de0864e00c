// Conduit pipeline activation
//
// A bounded pool of worker threads that constructs queue drivers for a batch of pipelines,
// runs the ones marked for consumption under a deadline, and collects every failure for the
// caller. The driver contracts live in the `conduit-api` crate.

pub mod activator;
pub mod config;
pub mod error;
pub mod logging;
pub mod processor;
pub mod queue;

// Re-export commonly used types
pub use activator::{Activator, ConstructorRegistry};
pub use config::ProcessorConfig;
pub use error::{ActivationError, ProcessorError, Stage};
pub use processor::{ActivationRequest, DriverRegistry, Processor};
pub use queue::MemoryQueue;
pub use conduit_api::{
    CancelGuard, Command, CommandSender, ContextError, Driver, DriverConstructor, DriverError, Item,
    Pipeline, Queue, RunContext,
};
