//! YAML configuration parser

use confgen_core::{Component, ConfgenError, Pipeline, SectionConfig, Service, UnifiedConfig};
use confgen_types::{Role, Section};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// YAML parser for unified configuration documents
pub struct YamlParser;

/// Document root. Unknown keys are rejected so typos surface early.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    logging: Option<RawSection>,

    #[serde(default)]
    metrics: Option<RawSection>,
}

/// Components stay as ordered YAML mappings here; their parameters are only
/// typed once the validator has matched them against the registry.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSection {
    #[serde(default)]
    receivers: Option<Mapping>,

    #[serde(default)]
    processors: Option<Mapping>,

    #[serde(default)]
    service: Option<RawService>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawService {
    #[serde(default)]
    pipelines: Option<Mapping>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPipeline {
    #[serde(default)]
    receivers: Vec<String>,

    #[serde(default)]
    processors: Vec<String>,
}

impl YamlParser {
    /// Parse a YAML string into a UnifiedConfig
    pub fn parse(content: &str) -> Result<UnifiedConfig, ConfgenError> {
        if is_blank(content) {
            return Ok(UnifiedConfig::new());
        }

        let raw = serde_yaml::from_str::<RawConfig>(content)
            .map_err(|e| ConfgenError::Parse(e.to_string()))?;
        raw_to_config(raw)
    }

    /// Parse raw bytes; the document must be UTF-8
    pub fn parse_bytes(bytes: &[u8]) -> Result<UnifiedConfig, ConfgenError> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| ConfgenError::Parse(format!("input is not valid UTF-8: {}", e)))?;
        Self::parse(content)
    }
}

/// True for documents holding nothing but whitespace and comments
fn is_blank(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

fn raw_to_config(raw: RawConfig) -> Result<UnifiedConfig, ConfgenError> {
    Ok(UnifiedConfig {
        logging: raw_to_section(Section::Logging, raw.logging.unwrap_or_default())?,
        metrics: raw_to_section(Section::Metrics, raw.metrics.unwrap_or_default())?,
    })
}

fn raw_to_section(section: Section, raw: RawSection) -> Result<SectionConfig, ConfgenError> {
    let receivers = raw_to_components(section, Role::Receiver, raw.receivers.unwrap_or_default())?;
    let processors =
        raw_to_components(section, Role::Processor, raw.processors.unwrap_or_default())?;

    let raw_pipelines = raw
        .service
        .and_then(|s| s.pipelines)
        .unwrap_or_default();
    let mut pipelines = Vec::with_capacity(raw_pipelines.len());
    for (key, value) in raw_pipelines {
        let name = key_to_string(&key)
            .ok_or_else(|| ConfgenError::Parse(format!("{} pipeline names must be strings", section)))?;

        let pipeline: RawPipeline = match value {
            Value::Null => RawPipeline::default(),
            other => serde_yaml::from_value(other).map_err(|e| {
                ConfgenError::Parse(format!("{} pipeline {:?}: {}", section, name, e))
            })?,
        };

        pipelines.push(Pipeline {
            name,
            receivers: pipeline.receivers,
            processors: pipeline.processors,
        });
    }

    Ok(SectionConfig {
        receivers,
        processors,
        service: Service { pipelines },
    })
}

fn raw_to_components(
    section: Section,
    role: Role,
    raw: Mapping,
) -> Result<Vec<Component>, ConfgenError> {
    let mut components = Vec::with_capacity(raw.len());

    for (key, value) in raw {
        let id = key_to_string(&key).ok_or_else(|| {
            ConfgenError::Parse(format!("{} {} IDs must be strings", section, role))
        })?;

        let mut params = match value {
            Value::Mapping(m) => m,
            _ => {
                return Err(ConfgenError::Parse(format!(
                    "{} {} {:?} must be a mapping",
                    section, role, id
                )))
            }
        };

        let type_name = match params.shift_remove("type") {
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(ConfgenError::Parse(format!(
                    "{} {} {:?} field \"type\" must be a string",
                    section, role, id
                )))
            }
            None => {
                return Err(ConfgenError::Parse(format!(
                    "{} {} {:?} is missing required field \"type\"",
                    section, role, id
                )))
            }
        };

        components.push(Component {
            id,
            type_name,
            params,
        });
    }

    Ok(components)
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
