//! OpenTelemetry collector configuration generator
//!
//! Emits a nested YAML document with receivers, processors, exporters and
//! `service.pipelines` mirroring the metrics section. Only components
//! referenced by a pipeline are written, in first-reference order.

use confgen_core::{
    ConfgenError, HostInfo, MetricsProcessor, MetricsReceiver, PlatformDefaults, Result,
    ValidatedConfig,
};
use confgen_types::Backend;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::platform::ensure_applicable;
use crate::traits::{ConfigGenerator, GeneratedFile};

/// Configuration file name
pub const CONFIG_FILE: &str = "otel.yaml";

/// Product name in the user agent the exporter reports
pub const USER_AGENT_PRODUCT: &str = "ops-agent-metrics";

const EXPORTER: &str = "googlecloud";
const RESOURCE_PROCESSOR: &str = "resource/host";

const HOSTMETRICS_SCRAPERS: &[&str] = &[
    "cpu",
    "disk",
    "filesystem",
    "load",
    "memory",
    "network",
    "paging",
    "process",
    "processes",
];

const IIS_COUNTERS: &[PerfCounterSet] = &[PerfCounterSet {
    object: "Web Service",
    instances: &["_Total"],
    counters: &[
        "Current Connections",
        "Total Bytes Received",
        "Total Bytes Sent",
        "Total Connection Attempts (all instances)",
        "Total Delete Requests",
        "Total Get Requests",
        "Total Head Requests",
        "Total Options Requests",
        "Total Post Requests",
        "Total Put Requests",
        "Total Trace Requests",
    ],
}];

const MSSQL_COUNTERS: &[PerfCounterSet] = &[
    PerfCounterSet {
        object: "SQLServer:General Statistics",
        instances: &[],
        counters: &["User Connections"],
    },
    PerfCounterSet {
        object: "SQLServer:Databases",
        instances: &["_Total"],
        counters: &["Transactions/sec", "Write Transactions/sec"],
    },
];

/// One Windows performance counter object
#[derive(Debug, Serialize)]
struct PerfCounterSet {
    object: &'static str,
    #[serde(skip_serializing_if = "no_instances")]
    instances: &'static [&'static str],
    counters: &'static [&'static str],
}

fn no_instances(instances: &&'static [&'static str]) -> bool {
    instances.is_empty()
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ReceiverConfig {
    Hostmetrics {
        collection_interval: String,
        scrapers: Mapping,
    },
    PerfCounters {
        collection_interval: String,
        perfcounters: &'static [PerfCounterSet],
    },
}

#[derive(Debug, Serialize)]
struct FilterConfig {
    metrics: FilterMetrics,
}

#[derive(Debug, Serialize)]
struct FilterMetrics {
    exclude: FilterExclude,
}

#[derive(Debug, Serialize)]
struct FilterExclude {
    match_type: &'static str,
    metric_names: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ResourceConfig {
    attributes: Vec<ResourceAttribute>,
}

#[derive(Debug, Serialize)]
struct ResourceAttribute {
    key: &'static str,
    value: String,
    action: &'static str,
}

#[derive(Debug, Serialize)]
struct ExporterConfig {
    user_agent: String,
}

#[derive(Debug, Serialize)]
struct PipelineConfig {
    receivers: Vec<String>,
    processors: Vec<String>,
    exporters: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct ServiceConfig {
    pipelines: Mapping,
}

#[derive(Debug, Serialize)]
struct OtelDocument {
    receivers: Mapping,
    processors: Mapping,
    exporters: Mapping,
    service: ServiceConfig,
}

/// Generate the collector configuration.
///
/// Returns an empty configuration when no metrics pipeline is declared.
pub fn generate_otel_config(config: &ValidatedConfig, host: &HostInfo) -> Result<String> {
    ensure_applicable(Backend::Otel, config, host)?;

    let metrics = config.metrics();
    if metrics.is_empty() {
        return Ok(String::new());
    }

    let mut receivers = Mapping::new();
    for (id, receiver) in metrics.referenced_receivers() {
        receivers.insert(receiver_name(id, receiver).into(), to_value(&receiver_config(receiver))?);
    }

    let mut processors = Mapping::new();
    for (id, processor) in metrics.referenced_processors() {
        let MetricsProcessor::ExcludeMetrics(exclude) = processor;
        let filter = FilterConfig {
            metrics: FilterMetrics {
                exclude: FilterExclude {
                    match_type: "regexp",
                    metric_names: exclude.metrics_pattern.iter().map(|p| pattern_regex(p)).collect(),
                },
            },
        };
        processors.insert(filter_name(id).into(), to_value(&filter)?);
    }
    processors.insert(RESOURCE_PROCESSOR.into(), to_value(&resource_config(host))?);

    let mut exporters = Mapping::new();
    exporters.insert(
        EXPORTER.into(),
        to_value(&ExporterConfig {
            user_agent: host.user_agent(USER_AGENT_PRODUCT),
        })?,
    );

    let mut pipelines = Mapping::new();
    for pipeline in metrics.pipelines() {
        let mut pipeline_processors: Vec<String> = metrics
            .pipeline_processors(pipeline)
            .map(|(id, _)| filter_name(id))
            .collect();
        pipeline_processors.push(RESOURCE_PROCESSOR.to_string());

        let pipeline_config = PipelineConfig {
            receivers: metrics
                .pipeline_receivers(pipeline)
                .map(|(id, r)| receiver_name(id, r))
                .collect(),
            processors: pipeline_processors,
            exporters: vec![EXPORTER],
        };
        pipelines.insert(
            format!("metrics/{}", pipeline.name).into(),
            to_value(&pipeline_config)?,
        );
    }

    let document = OtelDocument {
        receivers,
        processors,
        exporters,
        service: ServiceConfig { pipelines },
    };
    let text = serde_yaml::to_string(&document)
        .map_err(|e| ConfgenError::generation(Backend::Otel, e.to_string()))?;

    debug!(
        pipelines = metrics.pipelines().len(),
        bytes = text.len(),
        "generated otel configuration"
    );
    Ok(text)
}

fn receiver_name(id: &str, receiver: &MetricsReceiver) -> String {
    match receiver {
        MetricsReceiver::Hostmetrics(_) => format!("hostmetrics/{}", id),
        MetricsReceiver::Iis(_) | MetricsReceiver::Mssql(_) => {
            format!("windowsperfcounters/{}", id)
        }
    }
}

fn filter_name(id: &str) -> String {
    format!("filter/{}", id)
}

fn receiver_config(receiver: &MetricsReceiver) -> ReceiverConfig {
    let collection_interval = receiver.collection_interval().to_string();
    match receiver {
        MetricsReceiver::Hostmetrics(_) => ReceiverConfig::Hostmetrics {
            collection_interval,
            scrapers: HOSTMETRICS_SCRAPERS
                .iter()
                .map(|s| (Value::from(*s), Value::Mapping(Mapping::new())))
                .collect(),
        },
        MetricsReceiver::Iis(_) => ReceiverConfig::PerfCounters {
            collection_interval,
            perfcounters: IIS_COUNTERS,
        },
        MetricsReceiver::Mssql(_) => ReceiverConfig::PerfCounters {
            collection_interval,
            perfcounters: MSSQL_COUNTERS,
        },
    }
}

fn resource_config(host: &HostInfo) -> ResourceConfig {
    let upsert = |key, value: String| ResourceAttribute {
        key,
        value,
        action: "upsert",
    };
    ResourceConfig {
        attributes: vec![
            upsert("os.type", host.os.to_string()),
            upsert("os.name", host.platform.clone()),
            upsert("os.version", host.platform_version.clone()),
        ],
    }
}

/// Anchored regular expression for a metric pattern; a trailing `*`
/// matches any suffix
fn pattern_regex(pattern: &str) -> String {
    match pattern.strip_suffix('*') {
        Some(prefix) => format!("^{}.*$", regex::escape(prefix)),
        None => format!("^{}$", regex::escape(pattern)),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_yaml::to_value(value).map_err(|e| ConfgenError::generation(Backend::Otel, e.to_string()))
}

/// OpenTelemetry collector generator
pub struct OtelGenerator;

impl ConfigGenerator for OtelGenerator {
    fn backend(&self) -> Backend {
        Backend::Otel
    }

    fn generate(
        &self,
        config: &ValidatedConfig,
        defaults: &PlatformDefaults,
    ) -> Result<Vec<GeneratedFile>> {
        let text = generate_otel_config(config, &defaults.host)?;
        Ok(vec![GeneratedFile::new(CONFIG_FILE, text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_core::Registry;
    use confgen_types::Platform;

    fn windows_host() -> HostInfo {
        HostInfo::new(Platform::Windows, "win_platform", "win_platform_version")
    }

    fn load(yaml: &str) -> ValidatedConfig {
        confgen_parser::load(yaml, &Registry::builtin(), Platform::Windows).unwrap()
    }

    fn generate(yaml: &str) -> Value {
        let text = generate_otel_config(&load(yaml), &windows_host()).unwrap();
        serde_yaml::from_str(&text).unwrap()
    }

    fn keys(value: &Value) -> Vec<&str> {
        value
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str().unwrap())
            .collect()
    }

    const CONFIG: &str = r#"
metrics:
  receivers:
    web: {type: iis}
    host: {type: hostmetrics, collection_interval: 30s}
    unused: {type: mssql}
  processors:
    drop_cpu:
      type: exclude_metrics
      metrics_pattern: [agent.googleapis.com/cpu/*]
  service:
    pipelines:
      system:
        receivers: [host]
        processors: [drop_cpu]
      iis:
        receivers: [web]
"#;

    #[test]
    fn test_components_in_first_reference_order() {
        let doc = generate(CONFIG);
        assert_eq!(
            keys(&doc),
            vec!["receivers", "processors", "exporters", "service"]
        );
        assert_eq!(
            keys(&doc["receivers"]),
            vec!["hostmetrics/host", "windowsperfcounters/web"]
        );
        assert_eq!(keys(&doc["processors"]), vec!["filter/drop_cpu", "resource/host"]);
        assert_eq!(
            keys(&doc["service"]["pipelines"]),
            vec!["metrics/system", "metrics/iis"]
        );
    }

    #[test]
    fn test_receivers() {
        let doc = generate(CONFIG);
        let host = &doc["receivers"]["hostmetrics/host"];
        assert_eq!(host["collection_interval"].as_str(), Some("30s"));
        assert!(host["scrapers"]["cpu"].is_mapping());

        let web = &doc["receivers"]["windowsperfcounters/web"];
        assert_eq!(web["collection_interval"].as_str(), Some("60s"));
        assert_eq!(web["perfcounters"][0]["object"].as_str(), Some("Web Service"));
    }

    #[test]
    fn test_processors_and_pipelines() {
        let doc = generate(CONFIG);
        let filter = &doc["processors"]["filter/drop_cpu"]["metrics"]["exclude"];
        assert_eq!(filter["match_type"].as_str(), Some("regexp"));
        assert_eq!(
            filter["metric_names"][0].as_str(),
            Some(r"^agent\.googleapis\.com/cpu/.*$")
        );

        let attributes = &doc["processors"]["resource/host"]["attributes"];
        assert_eq!(attributes[0]["key"].as_str(), Some("os.type"));
        assert_eq!(attributes[0]["value"].as_str(), Some("windows"));
        assert_eq!(attributes[1]["value"].as_str(), Some("win_platform"));
        assert_eq!(attributes[2]["value"].as_str(), Some("win_platform_version"));
        assert_eq!(attributes[2]["action"].as_str(), Some("upsert"));

        let system = &doc["service"]["pipelines"]["metrics/system"];
        assert_eq!(system["receivers"][0].as_str(), Some("hostmetrics/host"));
        assert_eq!(system["processors"][0].as_str(), Some("filter/drop_cpu"));
        assert_eq!(system["processors"][1].as_str(), Some("resource/host"));
        assert_eq!(system["exporters"][0].as_str(), Some("googlecloud"));

        let iis = &doc["service"]["pipelines"]["metrics/iis"];
        assert_eq!(iis["processors"].as_sequence().unwrap().len(), 1);

        assert_eq!(
            doc["exporters"]["googlecloud"]["user_agent"].as_str(),
            Some("ops-agent-metrics/latest (Platform=windows;ShortName=win_platform;ShortVersion=win_platform_version)")
        );
    }

    #[test]
    fn test_no_metrics_is_empty() {
        let text = generate_otel_config(&load(""), &windows_host()).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let config = load(CONFIG);
        let first = generate_otel_config(&config, &windows_host()).unwrap();
        assert_eq!(generate_otel_config(&config, &windows_host()).unwrap(), first);
    }

    #[test]
    fn test_not_active_on_linux() {
        let config = confgen_parser::load("", &Registry::builtin(), Platform::Linux).unwrap();
        let host = HostInfo::new(Platform::Linux, "debian", "11");
        let err = generate_otel_config(&config, &host).unwrap_err();
        assert_eq!(err.to_string(), "otel generation failed: otel is not used on linux");
    }

    #[test]
    fn test_host_mismatch() {
        let host = HostInfo::new(Platform::Linux, "debian", "11");
        let err = generate_otel_config(&load(CONFIG), &host).unwrap_err();
        assert!(matches!(err, ConfgenError::Generation { backend: Backend::Otel, .. }));
    }
}
