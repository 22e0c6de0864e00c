//! # Activation Processor
//!
//! A fixed pool of worker threads that turns [`ActivationRequest`]s into running drivers.
//!
//! ## Key Concepts
//! - Requests go through one bounded FIFO queue; `submit` blocks while it is full
//! - Constructed drivers land in a shared [`DriverRegistry`] keyed by pipeline name
//! - Failures never stop the pool; they are collected and read back with
//!   [`Processor::errors`] once [`Processor::wait`] returns
//!
//! ## Usage
//! ```text
//! let processor = Processor::new(&config, registry, run_set)?;
//! for request in requests {
//!     processor.submit(request)?;
//! }
//! processor.wait();
//! let errors = processor.errors();
//! processor.shutdown()?;
//! ```

mod error_log;
mod pending;
mod registry;
mod request;
mod worker;

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use flume::Sender;
use tracing::debug;

use crate::config::ProcessorConfig;
use crate::error::{ActivationError, ProcessorError};
use crate::logging;
use worker::{Shared, Worker};

pub use error_log::ErrorLog;
pub use pending::{PendingCounter, PendingGuard};
pub use registry::DriverRegistry;
pub use request::ActivationRequest;

pub struct Processor {
    /// `None` once shut down
    sender: Mutex<Option<Sender<ActivationRequest>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shared: Arc<Shared>,
    worker_count: usize,
    queue_capacity: usize,
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("worker_count", &self.worker_count)
            .field("queue_capacity", &self.queue_capacity)
            .field("pending", &self.pending())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl Processor {
    /// Starts the pool, logging through the caller's current `tracing` dispatcher.
    ///
    /// `run_set` names the pipelines that are run right after construction; every other
    /// pipeline is only registered.
    pub fn new(
        config: &ProcessorConfig,
        registry: Arc<DriverRegistry>,
        run_set: HashSet<String>,
    ) -> Result<Self, ProcessorError> {
        Self::with_logger(logging::current_subscriber(), config, registry, run_set)
    }

    /// Starts the pool with workers logging to `logger`.
    pub fn with_logger(
        logger: tracing::Dispatch,
        config: &ProcessorConfig,
        registry: Arc<DriverRegistry>,
        run_set: HashSet<String>,
    ) -> Result<Self, ProcessorError> {
        config.validate()?;

        let (sender, receiver) = flume::bounded(config.queue_capacity);
        let shared = Arc::new(Shared {
            registry,
            run_set,
            errors: ErrorLog::new(),
            pending: PendingCounter::new(),
        });

        let mut workers = Vec::with_capacity(config.worker_count);
        for id in 0..config.worker_count {
            let worker = Worker::new(id, receiver.clone(), shared.clone(), logger.clone());
            // dropping `sender` on the error path lets already spawned workers exit
            workers.push(worker.spawn(format!("{}{}", config.thread_name_prefix, id))?);
        }

        tracing::dispatcher::with_default(&logger, || {
            debug!(
                workers = config.worker_count,
                queue_capacity = config.queue_capacity,
                "pipeline activation processor started"
            );
        });

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            shared,
            worker_count: config.worker_count,
            queue_capacity: config.queue_capacity,
        })
    }

    /// Queues `request`, blocking while the queue is full.
    pub fn submit(&self, request: ActivationRequest) -> Result<(), ProcessorError> {
        // clone out of the lock so a blocked send does not hold up shutdown
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ProcessorError::ShutDown)?;

        self.shared.pending.increment();
        if sender.send(request).is_err() {
            self.shared.pending.decrement();
            return Err(ProcessorError::ShutDown);
        }
        Ok(())
    }

    /// Blocks until every submitted request has been handled.
    pub fn wait(&self) {
        self.shared.pending.wait();
    }

    /// Like [`Self::wait`] but gives up after `timeout`; returns true if all work finished.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.shared.pending.wait_timeout(timeout)
    }

    /// Requests submitted but not yet fully handled.
    pub fn pending(&self) -> usize {
        self.shared.pending.get()
    }

    /// Every failure recorded so far, in the order workers recorded them.
    pub fn errors(&self) -> Vec<Arc<ActivationError>> {
        self.shared.errors.snapshot()
    }

    pub fn registry(&self) -> &Arc<DriverRegistry> {
        &self.shared.registry
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Closes the request queue. Workers finish what is already queued and then exit.
    pub fn shutdown(&self) -> Result<(), ProcessorError> {
        match self.sender.lock().unwrap_or_else(PoisonError::into_inner).take() {
            Some(_) => {
                debug!("pipeline activation processor shutting down");
                Ok(())
            }
            None => Err(ProcessorError::ShutDown),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    /// Shuts down if needed and waits for every worker thread to exit.
    pub fn join(&self) -> Result<(), ProcessorError> {
        let _ = self.shutdown();

        let workers = std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        let mut result = Ok(());
        for handle in workers {
            let name = handle.thread().name().unwrap_or("unnamed").to_string();
            if handle.join().is_err() {
                result = Err(ProcessorError::WorkerPanicked(name));
            }
        }
        result
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        self.sender.get_mut().unwrap_or_else(PoisonError::into_inner).take();
    }
}
