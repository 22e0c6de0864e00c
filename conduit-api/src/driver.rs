use std::sync::Arc;

use downcast_rs::{impl_downcast, DowncastSync};

use crate::command::CommandSender;
use crate::context::RunContext;
use crate::errors::DriverError;
use crate::pipeline::Pipeline;
use crate::queue::Queue;

/// A constructed queue driver bound to one pipeline.
///
/// Drivers are stored in the activation pool's registry as `Arc<dyn Driver>`; owners that
/// need the concrete type can recover it with `downcast_arc`.
pub trait Driver: DowncastSync {
    /// Consumes `pipeline` until it stops on its own, `ctx` is done, or an unrecoverable
    /// error occurs. Blocks the calling thread for that whole time.
    ///
    /// A driver that stops because of `ctx` should return the context's cause, e.g.
    /// `Err(ctx.done().into())`.
    fn run(&self, ctx: &RunContext, pipeline: &Pipeline) -> Result<(), DriverError>;
}
impl_downcast!(sync Driver);

/// Factory that builds drivers of one kind.
///
/// # Thread Safety
/// Called concurrently from every worker of the activation pool, each time with a different
/// pipeline. Construction may block on I/O (broker connection, topology declaration).
pub trait DriverConstructor: Send + Sync {
    /// Driver kind this constructor serves; matched against [`Pipeline::driver`].
    fn kind(&self) -> &str;

    /// Builds the driver for `pipeline` from the configuration found under `config_key`.
    fn driver_from_config(
        &self,
        config_key: &str,
        queue: Arc<dyn Queue>,
        pipeline: &Pipeline,
        commands: CommandSender,
    ) -> Result<Arc<dyn Driver>, DriverError>;
}
