//! Configuration parsing and validation for confgen
//!
//! This crate decodes unified YAML configuration documents and validates
//! them against a component registry for one target platform.

pub mod rules;
pub mod validator;
pub mod yaml;

pub use validator::ConfigValidator;
pub use yaml::YamlParser;

use confgen_core::{ConfgenError, Registry, UnifiedConfig, ValidatedConfig};
use confgen_types::Platform;
use tracing::debug;

/// Parse a configuration file from a path
pub fn parse_file(path: &str) -> Result<UnifiedConfig, ConfgenError> {
    let content = std::fs::read(path)
        .map_err(|e| ConfgenError::Config(format!("Failed to read file '{}': {}", path, e)))?;

    debug!(path, bytes = content.len(), "parsing configuration file");
    parse_bytes(&content)
}

/// Parse a configuration from a string
pub fn parse_string(content: &str) -> Result<UnifiedConfig, ConfgenError> {
    YamlParser::parse(content)
}

/// Parse a configuration from raw bytes
pub fn parse_bytes(content: &[u8]) -> Result<UnifiedConfig, ConfgenError> {
    YamlParser::parse_bytes(content)
}

/// Validate a parsed configuration for `platform`
pub fn validate(
    config: &UnifiedConfig,
    registry: &Registry,
    platform: Platform,
) -> Result<ValidatedConfig, ConfgenError> {
    ConfigValidator::new(registry, platform).validate(config)
}

/// Parse and validate in one step
pub fn load(
    content: &str,
    registry: &Registry,
    platform: Platform,
) -> Result<ValidatedConfig, ConfgenError> {
    let config = parse_string(content)?;
    validate(&config, registry, platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_simple_config() {
        let yaml = r#"
logging:
  receivers:
    r1:
      type: files
      include_paths: [/var/log/app.log]
  service:
    pipelines:
      p1:
        receivers: [r1]
"#;
        let config = load(yaml, &Registry::builtin(), Platform::Linux).unwrap();
        assert_eq!(config.logging().pipelines()[0].name, "p1");
    }

    #[test]
    fn test_load_reports_parse_errors_first() {
        let err = load("metrics: [", &Registry::builtin(), Platform::Linux).unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_file("/nonexistent/confgen.yaml").unwrap_err();
        assert!(matches!(err, ConfgenError::Config(_)));
    }
}
