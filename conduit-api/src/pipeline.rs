use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Priority used when a pipeline does not configure one.
pub const DEFAULT_PRIORITY: i64 = 10;

/// Descriptor of one pipeline: its unique name, the kind of driver that serves it,
/// and the driver-specific options it was declared with.
///
/// # Examples
///
/// ```rust
/// use conduit_api::Pipeline;
///
/// let pipeline = Pipeline::new("emails", "amqp")
///     .with("prefetch", 10)
///     .with("queue", "email-jobs");
///
/// assert_eq!(pipeline.int("prefetch", 1), 10);
/// assert_eq!(pipeline.string("queue", "default"), "email-jobs");
/// assert_eq!(pipeline.priority(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    name: String,
    driver: String,
    #[serde(default)]
    options: Map<String, Value>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: driver.into(),
            options: Map::new(),
        }
    }

    /// Builder-style option setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of driver that serves this pipeline (e.g. `amqp`, `memory`).
    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// String option, falling back to `default` when missing or not a string.
    pub fn string(&self, key: &str, default: &str) -> String {
        self.options
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Integer option. Numeric strings are accepted since configs often quote numbers.
    pub fn int(&self, key: &str, default: i64) -> i64 {
        match self.options.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Boolean option. `"true"`/`"false"` strings are accepted as well.
    pub fn bool(&self, key: &str, default: bool) -> bool {
        match self.options.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn priority(&self) -> i64 {
        self.int("priority", DEFAULT_PRIORITY)
    }
}
