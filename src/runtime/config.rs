use crate::runtime::error::Error;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THREAD_NAME: &str = "coalesce-worker";

/// Settings for the executor's worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Name given to the worker thread.
    pub thread_name: String,
    /// Worker stack size in bytes. `None` keeps the platform default.
    pub stack_size: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}

impl ExecutorConfig {
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.stack_size == Some(0) {
            return Err(Error::Config("stack_size must be > 0".to_string()));
        }
        // The OS thread name is a C string.
        if self.thread_name.contains('\0') {
            return Err(Error::Config(
                "thread_name must not contain NUL bytes".to_string(),
            ));
        }
        Ok(())
    }
}
