//! Typed metrics components

use confgen_types::param::parse_duration_secs;
use confgen_types::{Role, Section};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use super::validated::{decode, TypedComponent};

/// Host-level system metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostmetricsReceiver {
    pub collection_interval: String,
}

/// Internet Information Services performance counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IisReceiver {
    pub collection_interval: String,
}

/// SQL Server performance counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MssqlReceiver {
    pub collection_interval: String,
}

/// Metrics receiver kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsReceiver {
    Hostmetrics(HostmetricsReceiver),
    Iis(IisReceiver),
    Mssql(MssqlReceiver),
}

impl MetricsReceiver {
    /// Collection interval as written, e.g. `60s`
    pub fn collection_interval(&self) -> &str {
        match self {
            MetricsReceiver::Hostmetrics(r) => &r.collection_interval,
            MetricsReceiver::Iis(r) => &r.collection_interval,
            MetricsReceiver::Mssql(r) => &r.collection_interval,
        }
    }

    /// Collection interval in seconds
    pub fn collection_interval_secs(&self) -> Option<u64> {
        parse_duration_secs(self.collection_interval())
    }

    /// Metric families (the path segment after the agent prefix) this
    /// receiver produces
    pub fn metric_families(&self) -> &'static [&'static str] {
        match self {
            MetricsReceiver::Hostmetrics(_) => &[
                "agent", "cpu", "disk", "interface", "memory", "network", "pagefile",
                "processes", "swap",
            ],
            MetricsReceiver::Iis(_) => &["iis"],
            MetricsReceiver::Mssql(_) => &["mssql"],
        }
    }
}

impl TypedComponent for MetricsReceiver {
    const SECTION: Section = Section::Metrics;
    const ROLE: Role = Role::Receiver;

    fn from_params(type_name: &str, params: Mapping) -> Option<Result<Self, serde_yaml::Error>> {
        let decoded = match type_name {
            "hostmetrics" => decode(params).map(MetricsReceiver::Hostmetrics),
            "iis" => decode(params).map(MetricsReceiver::Iis),
            "mssql" => decode(params).map(MetricsReceiver::Mssql),
            _ => return None,
        };
        Some(decoded)
    }

    fn type_name(&self) -> &'static str {
        match self {
            MetricsReceiver::Hostmetrics(_) => "hostmetrics",
            MetricsReceiver::Iis(_) => "iis",
            MetricsReceiver::Mssql(_) => "mssql",
        }
    }
}

/// Drops metrics whose names match any of the patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeMetricsProcessor {
    pub metrics_pattern: Vec<String>,
}

/// Metrics processor kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsProcessor {
    ExcludeMetrics(ExcludeMetricsProcessor),
}

impl TypedComponent for MetricsProcessor {
    const SECTION: Section = Section::Metrics;
    const ROLE: Role = Role::Processor;

    fn from_params(type_name: &str, params: Mapping) -> Option<Result<Self, serde_yaml::Error>> {
        let decoded = match type_name {
            "exclude_metrics" => decode(params).map(MetricsProcessor::ExcludeMetrics),
            _ => return None,
        };
        Some(decoded)
    }

    fn type_name(&self) -> &'static str {
        match self {
            MetricsProcessor::ExcludeMetrics(_) => "exclude_metrics",
        }
    }
}
