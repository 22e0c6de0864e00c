#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use conduit::{
    ActivationRequest, CommandSender, Driver, DriverConstructor, DriverError, MemoryQueue,
    Pipeline, Queue, RunContext,
};

/// What a mock driver does when run
#[derive(Debug, Clone)]
pub enum RunBehavior {
    /// Return immediately
    Finish,
    /// Block until the context is done and return its cause
    UntilDone,
    Fail(String),
    Panic(String),
}

#[derive(Debug)]
pub struct MockDriver {
    /// Construction sequence number, starting at 1
    pub serial: usize,
    pub config_key: String,
    behavior: RunBehavior,
    runs: Arc<AtomicUsize>,
}

impl Driver for MockDriver {
    fn run(&self, ctx: &RunContext, _pipeline: &Pipeline) -> Result<(), DriverError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            RunBehavior::Finish => Ok(()),
            RunBehavior::UntilDone => Err(ctx.done().into()),
            RunBehavior::Fail(message) => Err(DriverError::Other(anyhow!(message.clone()))),
            RunBehavior::Panic(message) => panic!("{}", message),
        }
    }
}

/// Constructor whose outcome is scripted per pipeline name
pub struct MockConstructor {
    kind: String,
    behavior: RunBehavior,
    failures: HashMap<String, String>,
    panics: HashSet<String>,
    delay: Duration,
    pub constructed: AtomicUsize,
    pub runs: Arc<AtomicUsize>,
    pub config_keys: Mutex<Vec<String>>,
}

impl MockConstructor {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            behavior: RunBehavior::Finish,
            failures: HashMap::new(),
            panics: HashSet::new(),
            delay: Duration::ZERO,
            constructed: AtomicUsize::new(0),
            runs: Arc::new(AtomicUsize::new(0)),
            config_keys: Mutex::new(Vec::new()),
        }
    }

    pub fn with_behavior(mut self, behavior: RunBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn failing(mut self, pipeline: &str, message: &str) -> Self {
        self.failures.insert(pipeline.to_string(), message.to_string());
        self
    }

    pub fn panicking(mut self, pipeline: &str) -> Self {
        self.panics.insert(pipeline.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }
}

impl DriverConstructor for MockConstructor {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn driver_from_config(
        &self,
        config_key: &str,
        _queue: Arc<dyn Queue>,
        pipeline: &Pipeline,
        _commands: CommandSender,
    ) -> Result<Arc<dyn Driver>, DriverError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.config_keys.lock().unwrap().push(config_key.to_string());

        if self.panics.contains(pipeline.name()) {
            panic!("constructor exploded for {}", pipeline.name());
        }
        if let Some(message) = self.failures.get(pipeline.name()) {
            return Err(DriverError::Other(anyhow!(message.clone())));
        }

        let serial = self.constructed.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(MockDriver {
            serial,
            config_key: config_key.to_string(),
            behavior: self.behavior.clone(),
            runs: self.runs.clone(),
        }))
    }
}

/// Builds a request for `name` served by `constructor`
pub fn request(constructor: &Arc<MockConstructor>, name: &str, timeout_secs: u64) -> ActivationRequest {
    let (commands, _) = flume::unbounded();
    let constructor: Arc<dyn DriverConstructor> = constructor.clone();
    ActivationRequest::new(
        constructor,
        Pipeline::new(name, "mock"),
        Arc::new(MemoryQueue::new()),
        commands,
        format!("jobs.pipelines.{}", name),
        timeout_secs,
    )
}

pub fn names(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}
