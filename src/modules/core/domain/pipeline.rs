//! Pipeline definitions

use serde::{Deserialize, Serialize};

/// A named, ordered chain of receivers and processors within one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Unique name within the section
    pub name: String,

    /// Receiver IDs in declaration order
    #[serde(default)]
    pub receivers: Vec<String>,

    /// Processor IDs in declaration order
    #[serde(default)]
    pub processors: Vec<String>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receivers: Vec::new(),
            processors: Vec::new(),
        }
    }

    /// Append a receiver reference
    pub fn with_receiver(mut self, id: impl Into<String>) -> Self {
        self.receivers.push(id.into());
        self
    }

    /// Append a processor reference
    pub fn with_processor(mut self, id: impl Into<String>) -> Self {
        self.processors.push(id.into());
        self
    }

    /// Routing tag for records read by `receiver` in this pipeline
    pub fn tag(&self, receiver: &str) -> String {
        format!("{}.{}", self.name, receiver)
    }
}
