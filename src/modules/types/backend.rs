//! Downstream backend definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Downstream telemetry engines the generators target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Log-shipping engine
    FluentBit,
    /// Legacy metrics daemon
    Collectd,
    /// Observability-pipeline collector
    Otel,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::FluentBit => write!(f, "fluent-bit"),
            Backend::Collectd => write!(f, "collectd"),
            Backend::Otel => write!(f, "otel"),
        }
    }
}

impl Backend {
    /// File name of the backend's own log under the agent log directory.
    ///
    /// The collector logs to the platform event log instead of a file.
    pub fn self_log_file(&self) -> Option<&'static str> {
        match self {
            Backend::FluentBit => Some("logging-module.log"),
            Backend::Collectd => Some("metrics-module.log"),
            Backend::Otel => None,
        }
    }

    /// Routing tag used for the backend's own log records
    pub fn self_log_tag(&self) -> &'static str {
        match self {
            Backend::FluentBit => "ops-agent-fluent-bit",
            Backend::Collectd => "ops-agent-collectd",
            Backend::Otel => "ops-agent-otel",
        }
    }
}
