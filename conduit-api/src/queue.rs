use std::fmt;

/// A job waiting to be processed, as stored in a [`Queue`].
#[derive(Clone, PartialEq, Eq)]
pub struct Item {
    /// Unique job id.
    pub id: String,
    /// Pipeline the job arrived on.
    pub pipeline: String,
    /// Lower values are extracted first.
    pub priority: i64,
    pub payload: Vec<u8>,
}

impl Item {
    pub fn new(id: impl Into<String>, pipeline: impl Into<String>, priority: i64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            pipeline: pipeline.into(),
            priority,
            payload: payload.into(),
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("pipeline", &self.pipeline)
            .field("priority", &self.priority)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// Priority queue shared by every driver; drivers insert the jobs they consume from their
/// broker and the job workers extract them.
///
/// # Thread Safety
/// Implementations must accept concurrent inserts from many driver threads.
pub trait Queue: Send + Sync {
    fn insert(&self, item: Item);

    /// Removes and returns the lowest-priority-value item, if any.
    fn extract_min(&self) -> Option<Item>;

    /// Removes every item that belongs to `pipeline`, returning them.
    fn remove(&self, pipeline: &str) -> Vec<Item>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
