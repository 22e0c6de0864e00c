//! # Conduit API
//!
//! The contracts shared between the conduit activation pool and the queue drivers it builds.
//! A driver crate implements [`DriverConstructor`] and [`Driver`]; the pool only ever talks to
//! drivers through these traits.
//!
//! ## Core Components
//!
//! - **Pipeline**: a named queue-consumption unit with a driver kind and free-form options
//! - **DriverConstructor**: builds a driver for one pipeline from its configuration key
//! - **Driver**: consumes a pipeline until its [`RunContext`] is done
//! - **Queue**: the priority queue drivers push received jobs into
//! - **Command**: control messages drivers send back to the owner of the pipelines
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use conduit_api::{
//!     CommandSender, Driver, DriverConstructor, DriverError, Pipeline, Queue, RunContext,
//! };
//!
//! struct NullDriver;
//!
//! impl Driver for NullDriver {
//!     fn run(&self, ctx: &RunContext, _pipeline: &Pipeline) -> Result<(), DriverError> {
//!         // consume until the owner cancels us or the deadline passes
//!         Err(ctx.done().into())
//!     }
//! }
//!
//! struct NullConstructor;
//!
//! impl DriverConstructor for NullConstructor {
//!     fn kind(&self) -> &str {
//!         "null"
//!     }
//!
//!     fn driver_from_config(
//!         &self,
//!         _config_key: &str,
//!         _queue: Arc<dyn Queue>,
//!         _pipeline: &Pipeline,
//!         _commands: CommandSender,
//!     ) -> Result<Arc<dyn Driver>, DriverError> {
//!         Ok(Arc::new(NullDriver))
//!     }
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`pipeline`]: pipeline descriptors and their options
//! - [`driver`]: driver and constructor traits
//! - [`context`]: deadline-bound run contexts
//! - [`queue`]: the job queue contract
//! - [`command`]: driver-to-owner commands
//! - [`errors`]: error types

pub mod command;
pub mod context;
pub mod driver;
pub mod errors;
pub mod pipeline;
pub mod queue;

pub use command::{Command, CommandSender};
pub use context::{CancelGuard, RunContext};
pub use driver::{Driver, DriverConstructor};
pub use errors::{ContextError, DriverError};
pub use pipeline::Pipeline;
pub use queue::{Item, Queue};
