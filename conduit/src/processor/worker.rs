//! # Activation Worker
//!
//! One worker thread of the [`Processor`](super::Processor) pool.
//!
//! ## Core Algorithm
//! 1. Pull the next activation request from the shared queue (exit once closed and drained)
//! 2. Build the driver through the request's constructor
//! 3. On failure record the error and move on
//! 4. On success register the driver under the pipeline name
//! 5. If the pipeline is marked for consumption, run it under a deadline-bound context and
//!    record any error the run returns
//! 6. Release the request's pending count
//!
//! Constructor and driver panics are caught here and recorded like any other failure, so a
//! misbehaving driver never takes a worker thread down with it.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use conduit_api::RunContext;
use flume::Receiver;
use tracing::{debug, debug_span, error, warn};

use super::error_log::ErrorLog;
use super::pending::PendingCounter;
use super::registry::DriverRegistry;
use super::request::ActivationRequest;
use crate::error::{ActivationError, Stage};

/// State shared by the processor handle and all of its workers.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) registry: Arc<DriverRegistry>,
    pub(crate) run_set: HashSet<String>,
    pub(crate) errors: ErrorLog,
    pub(crate) pending: PendingCounter,
}

pub(crate) struct Worker {
    id: usize,
    requests: Receiver<ActivationRequest>,
    shared: Arc<Shared>,
    dispatch: tracing::Dispatch,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        requests: Receiver<ActivationRequest>,
        shared: Arc<Shared>,
        dispatch: tracing::Dispatch,
    ) -> Self {
        Self { id, requests, shared, dispatch }
    }

    pub(crate) fn spawn(self, name: String) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name).spawn(move || {
            let dispatch = self.dispatch.clone();
            tracing::dispatcher::with_default(&dispatch, || self.run_loop());
        })
    }

    fn run_loop(self) {
        let span = debug_span!("activation_worker", worker = self.id);
        let _enter = span.enter();

        for request in self.requests.iter() {
            let _pending = self.shared.pending.guard();
            self.activate(request);
        }

        debug!("exited from pipeline activation worker");
    }

    fn activate(&self, request: ActivationRequest) {
        let ActivationRequest {
            id,
            constructor,
            pipeline,
            queue,
            commands,
            config_key,
            timeout,
        } = request;
        let name = pipeline.name().to_string();
        let kind = pipeline.driver().to_string();

        debug!(request = %id, pipeline = %name, driver = %kind, "initializing driver");
        let started = Instant::now();

        let constructed = panic::catch_unwind(AssertUnwindSafe(|| {
            constructor.driver_from_config(&config_key, queue, &pipeline, commands)
        }));

        let driver = match constructed {
            Ok(Ok(driver)) => driver,
            Ok(Err(err)) => {
                error!(pipeline = %name, driver = %kind, error = %err, "failed to initialize driver");
                self.shared.errors.push(ActivationError::Construction {
                    pipeline: name,
                    driver: kind,
                    error: err,
                });
                return;
            }
            Err(payload) => {
                self.record_panic(name, kind, Stage::Construct, payload);
                return;
            }
        };

        if self.shared.registry.insert(name.as_str(), driver.clone()).is_some() {
            warn!(pipeline = %name, driver = %kind, "pipeline activated twice, previous driver replaced");
        }

        debug!(
            pipeline = %name,
            driver = %kind,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "driver ready"
        );

        if !self.shared.run_set.contains(&name) {
            return;
        }

        let (ctx, cancel) = RunContext::with_timeout(timeout);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| driver.run(&ctx, &pipeline)));
        cancel.cancel();

        match outcome {
            Ok(Ok(())) => {
                debug!(pipeline = %name, driver = %kind, elapsed_ms = started.elapsed().as_millis() as u64, "driver run finished");
            }
            Ok(Err(err)) => {
                error!(pipeline = %name, driver = %kind, error = %err, "driver run failed");
                self.shared.errors.push(ActivationError::Run {
                    pipeline: name,
                    driver: kind,
                    error: err,
                });
            }
            Err(payload) => self.record_panic(name, kind, Stage::Run, payload),
        }
    }

    fn record_panic(&self, pipeline: String, driver: String, stage: Stage, payload: Box<dyn Any + Send>) {
        let message = panic_message(payload);
        error!(pipeline = %pipeline, driver = %driver, stage = %stage, "driver panicked: {}", message);
        self.shared.errors.push(ActivationError::Panicked {
            pipeline,
            driver,
            stage,
            message,
        });
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "unknown panic payload".to_string(),
        },
    }
}
