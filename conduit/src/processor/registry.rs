use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use conduit_api::Driver;

/// Pipeline name → constructed driver.
///
/// Written by activation workers, one entry per successful construction. A second write for
/// the same name replaces the first and hands the previous driver back to the writer.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Arc<dyn Driver>>>,
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("pipelines", &self.names())
            .finish()
    }
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `driver` under `pipeline`, returning the driver it replaced.
    pub fn insert(&self, pipeline: impl Into<String>, driver: Arc<dyn Driver>) -> Option<Arc<dyn Driver>> {
        self.drivers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pipeline.into(), driver)
    }

    pub fn get(&self, pipeline: &str) -> Option<Arc<dyn Driver>> {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pipeline)
            .cloned()
    }

    /// Looks up `pipeline` and downcasts its driver to `T`.
    pub fn get_as<T: Driver>(&self, pipeline: &str) -> Option<Arc<T>> {
        self.get(pipeline)?.downcast_arc::<T>().ok()
    }

    pub fn remove(&self, pipeline: &str) -> Option<Arc<dyn Driver>> {
        self.drivers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(pipeline)
    }

    pub fn contains(&self, pipeline: &str) -> bool {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(pipeline)
    }

    /// Registered pipeline names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.drivers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
