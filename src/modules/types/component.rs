//! Configuration sections and component roles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level telemetry domain of a unified configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Log collection pipelines
    Logging,
    /// Metrics collection pipelines
    Metrics,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Logging => write!(f, "logging"),
            Section::Metrics => write!(f, "metrics"),
        }
    }
}

/// Role a user-declared component plays inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Data source
    Receiver,
    /// Transformation or filter
    Processor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Receiver => write!(f, "receiver"),
            Role::Processor => write!(f, "processor"),
        }
    }
}
