//! Semantic validation of unified configurations

use confgen_core::{
    Component, ConfgenError, Registry, Result, SectionConfig, TypedComponent, UnifiedConfig,
    ValidatedConfig, ValidatedSection,
};
use confgen_types::{Platform, Role, Section};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::rules;

/// Component IDs and pipeline names end up in routing tags and file names
static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Namespace of the built-in parsers
pub const RESERVED_PREFIX: &str = "lib:";

/// Configuration validator.
///
/// Checks a parsed configuration against a component registry for one
/// target platform and lowers it into a [`ValidatedConfig`]. The first
/// problem found is returned; traversal order is fixed (logging, then
/// metrics, each in declaration order) so the same input always reports the
/// same error.
pub struct ConfigValidator<'a> {
    registry: &'a Registry,
    platform: Platform,
}

impl<'a> ConfigValidator<'a> {
    /// Create a validator for `platform`
    pub fn new(registry: &'a Registry, platform: Platform) -> Self {
        Self { registry, platform }
    }

    /// Validate the entire configuration
    pub fn validate(&self, config: &UnifiedConfig) -> Result<ValidatedConfig> {
        debug!(platform = %self.platform, "validating configuration");
        if config.is_empty() {
            debug!("configuration declares no components or pipelines");
        }

        let logging = self.validate_section(Section::Logging, &config.logging)?;
        rules::check_logging(&logging)?;

        let metrics = self.validate_section(Section::Metrics, &config.metrics)?;
        rules::check_metrics(&metrics)?;

        debug!(
            logging_pipelines = logging.pipelines().len(),
            metrics_pipelines = metrics.pipelines().len(),
            "configuration is valid"
        );
        Ok(ValidatedConfig::new(self.platform, logging, metrics))
    }

    fn validate_section<R, P>(
        &self,
        section: Section,
        config: &SectionConfig,
    ) -> Result<ValidatedSection<R, P>>
    where
        R: TypedComponent,
        P: TypedComponent,
    {
        self.validate_identifiers(section, config)?;

        let components = config
            .receivers
            .iter()
            .map(|c| (Role::Receiver, c))
            .chain(config.processors.iter().map(|c| (Role::Processor, c)));
        for (role, component) in components {
            self.check_type(section, role, component)?;
        }

        let receivers = config
            .receivers
            .iter()
            .map(|c| self.lower::<R>(c).map(|r| (c.id.clone(), r)))
            .collect::<Result<Vec<_>>>()?;
        let processors = config
            .processors
            .iter()
            .map(|c| self.lower::<P>(c).map(|p| (c.id.clone(), p)))
            .collect::<Result<Vec<_>>>()?;

        self.validate_pipelines(section, config)?;

        Ok(ValidatedSection::new(
            receivers,
            processors,
            config.pipelines().to_vec(),
        ))
    }

    /// Check IDs and pipeline names, receivers first, then processors, then pipelines
    fn validate_identifiers(&self, section: Section, config: &SectionConfig) -> Result<()> {
        let ids = config
            .receivers
            .iter()
            .map(|c| ("receiver", c.id.as_str()))
            .chain(config.processors.iter().map(|c| ("processor", c.id.as_str())))
            .chain(config.pipelines().iter().map(|p| ("pipeline", p.name.as_str())));

        for (kind, id) in ids {
            let reason = if id.starts_with(RESERVED_PREFIX) {
                Some(format!("must not start with the reserved prefix {:?}", RESERVED_PREFIX))
            } else if !IDENTIFIER_PATTERN.is_match(id) {
                Some("may only contain letters, digits, '_' and '-'".to_string())
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(ConfgenError::InvalidIdentifier {
                    section,
                    kind,
                    id: id.to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Registry lookup for one component
    fn check_type(&self, section: Section, role: Role, component: &Component) -> Result<()> {
        let known = self.registry.find(section, role, &component.type_name);
        match known {
            None => Err(ConfgenError::unsupported_type(
                section,
                role,
                &component.id,
                &component.type_name,
                &self.registry.type_names(section, role),
            )),
            Some(spec) if !spec.supports(self.platform) => {
                Err(ConfgenError::unsupported_on_platform(
                    section,
                    role,
                    &component.id,
                    &component.type_name,
                    self.platform,
                    &self.registry.type_names_on(section, role, self.platform),
                ))
            }
            Some(_) => Ok(()),
        }
    }

    /// Check parameters against the registry, apply defaults and decode
    fn lower<T: TypedComponent>(&self, component: &Component) -> Result<T> {
        let (section, role) = (T::SECTION, T::ROLE);
        let spec = self
            .registry
            .lookup(section, role, &component.type_name, self.platform)
            .ok_or_else(|| {
                ConfgenError::unsupported_type(
                    section,
                    role,
                    &component.id,
                    &component.type_name,
                    &self.registry.type_names(section, role),
                )
            })?;
        let invalid = |param: &str, reason: String| {
            ConfgenError::invalid_parameter(section, role, &component.id, param, reason)
        };

        // Null values count as absent
        let mut params = Mapping::new();
        for (key, value) in &component.params {
            let name = key.as_str().ok_or_else(|| {
                invalid(
                    &format!("{:?}", key),
                    "parameter names must be strings".to_string(),
                )
            })?;
            let param_spec = spec
                .param(name)
                .ok_or_else(|| invalid(name, "unknown parameter".to_string()))?;
            if value.is_null() {
                continue;
            }
            param_spec.kind.check(value).map_err(|reason| invalid(name, reason))?;
            params.insert(Value::from(name), value.clone());
        }

        for param_spec in &spec.params {
            let present = params.contains_key(param_spec.name);
            if param_spec.required && !present {
                return Err(invalid(
                    param_spec.name,
                    "required parameter is missing".to_string(),
                ));
            }
            if let Some(other) = param_spec.requires {
                if present && !params.contains_key(other) {
                    return Err(invalid(
                        param_spec.name,
                        format!("requires parameter {:?} to be set", other),
                    ));
                }
            }
        }

        for param_spec in &spec.params {
            if let Some(default) = param_spec.default {
                if !params.contains_key(param_spec.name) {
                    params.insert(Value::from(param_spec.name), Value::from(default));
                }
            }
        }

        match T::from_params(&component.type_name, params) {
            Some(Ok(typed)) => Ok(typed),
            Some(Err(e)) => Err(ConfgenError::Parse(format!(
                "{} {} {:?}: {}",
                section, role, component.id, e
            ))),
            None => Err(ConfgenError::unsupported_type(
                section,
                role,
                &component.id,
                &component.type_name,
                &self.registry.type_names(section, role),
            )),
        }
    }

    /// Every pipeline has a receiver; every reference resolves exactly once
    fn validate_pipelines(&self, section: Section, config: &SectionConfig) -> Result<()> {
        for pipeline in config.pipelines() {
            if pipeline.receivers.is_empty() {
                return Err(ConfgenError::invalid_pipeline(
                    section,
                    &pipeline.name,
                    "must reference at least one receiver",
                ));
            }

            for (role, ids) in [
                (Role::Receiver, &pipeline.receivers),
                (Role::Processor, &pipeline.processors),
            ] {
                for (index, id) in ids.iter().enumerate() {
                    if config.find_component(role, id).is_none() {
                        return Err(ConfgenError::UndefinedReference {
                            section,
                            pipeline: pipeline.name.clone(),
                            role,
                            id: id.clone(),
                        });
                    }
                    if ids[..index].contains(id) {
                        return Err(ConfgenError::invalid_pipeline(
                            section,
                            &pipeline.name,
                            format!("references {} {:?} more than once", role, id),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::YamlParser;
    use confgen_core::{ComponentSpec, LoggingReceiver, MetricsReceiver, ParameterSpec};
    use confgen_types::ParamKind;

    fn validate(yaml: &str, platform: Platform) -> Result<ValidatedConfig> {
        let registry = Registry::builtin();
        let config = YamlParser::parse(yaml).unwrap();
        ConfigValidator::new(&registry, platform).validate(&config)
    }

    fn error(yaml: &str, platform: Platform) -> ConfgenError {
        validate(yaml, platform).unwrap_err()
    }

    #[test]
    fn test_validate_files_pipeline() {
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
        let config = validate(yaml, Platform::Linux).unwrap();
        assert_eq!(config.platform(), Platform::Linux);
        assert_eq!(config.logging().pipelines().len(), 1);
        match config.logging().receiver("r1").unwrap() {
            LoggingReceiver::Files(r) => {
                assert_eq!(r.include_paths, vec!["/var/log/app.log"]);
                assert!(r.exclude_paths.is_empty());
            }
            other => panic!("unexpected receiver {:?}", other),
        }
        assert!(config.metrics().is_empty());
    }

    #[test]
    fn test_undefined_reference() {
        let yaml = r#"
logging:
  receivers:
    r1:
      type: files
      include_paths: [/var/log/app.log]
  service:
    pipelines:
      p1:
        receivers: [r1, missing]
"#;
        let err = error(yaml, Platform::Linux);
        assert!(matches!(
            &err,
            ConfgenError::UndefinedReference { pipeline, id, role: Role::Receiver, .. }
                if pipeline == "p1" && id == "missing"
        ));
        assert_eq!(
            err.to_string(),
            "logging pipeline \"p1\" references undefined receiver \"missing\""
        );
    }

    #[test]
    fn test_undefined_processor_reference() {
        let yaml = r#"
logging:
  receivers:
    r1: {type: files, include_paths: [/a.log]}
  service:
    pipelines:
      p1: {receivers: [r1], processors: [nope]}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging pipeline \"p1\" references undefined processor \"nope\""
        );
    }

    #[test]
    fn test_empty_pipeline() {
        let yaml = r#"
logging:
  receivers:
    r1: {type: files, include_paths: [/a.log]}
  service:
    pipelines:
      p1: {receivers: []}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging pipeline \"p1\" must reference at least one receiver"
        );
        assert_eq!(err.kind(), "InvalidPipelineError");
    }

    #[test]
    fn test_duplicate_reference() {
        let yaml = r#"
logging:
  receivers:
    r1: {type: files, include_paths: [/a.log]}
  service:
    pipelines:
      p1: {receivers: [r1, r1]}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging pipeline \"p1\" references receiver \"r1\" more than once"
        );
    }

    #[test]
    fn test_unsupported_type() {
        let yaml = r#"
logging:
  receivers:
    r1: {type: journald}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging receiver \"r1\" with type \"journald\" is not supported. Supported logging receiver types: [files, syslog, windows_event_log]."
        );
    }

    #[test]
    fn test_first_invalid_parameter_in_declared_order() {
        let yaml = r#"
logging:
  receivers:
    r1: {type: files, include_paths: 5, exclude_paths: 7}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging receiver \"r1\" has invalid parameter \"include_paths\": expected a list of strings"
        );
    }

    #[test]
    fn test_path_with_line_break_is_rejected() {
        let yaml = r#"
logging:
  receivers:
    r1:
      type: files
      include_paths: ["/a.log\n[OUTPUT]\n    Name null"]
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging receiver \"r1\" has invalid parameter \"include_paths\": must not contain line breaks or other control characters"
        );
        assert_eq!(err.kind(), "InvalidParameterError");
    }

    #[test]
    fn test_regex_with_line_break_is_rejected() {
        let yaml = r#"
logging:
  processors:
    re:
      type: parse_regex
      regex: "^(?<message>.*)$\n[OUTPUT]"
"#;
        let err = error(yaml, Platform::Linux);
        assert!(matches!(
            &err,
            ConfgenError::InvalidParameter { role: Role::Processor, param, .. } if param == "regex"
        ));
    }

    #[test]
    fn test_type_is_keyed_by_role() {
        let yaml = r#"
logging:
  processors:
    p1: {type: files, include_paths: [/a.log]}
"#;
        let err = error(yaml, Platform::Linux);
        assert!(matches!(err, ConfgenError::UnsupportedType { role: Role::Processor, .. }));
    }

    #[test]
    fn test_unsupported_on_platform() {
        let yaml = r#"
metrics:
  receivers:
    web:
      type: iis
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "metrics receiver \"web\" with type \"iis\" is not supported on linux. Supported metrics receiver types on linux: [hostmetrics]."
        );
        assert!(validate(yaml, Platform::Windows).is_ok());
    }

    #[test]
    fn test_missing_required_parameter() {
        let yaml = r#"
logging:
  receivers:
    sys:
      type: syslog
      transport_protocol: tcp
      listen_host: 0.0.0.0
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging receiver \"sys\" has invalid parameter \"listen_port\": required parameter is missing"
        );
    }

    #[test]
    fn test_unknown_parameter() {
        let yaml = r#"
logging:
  receivers:
    r1:
      type: files
      include_paths: [/a.log]
      follow: true
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging receiver \"r1\" has invalid parameter \"follow\": unknown parameter"
        );
    }

    #[test]
    fn test_parameter_type_checked_before_missing() {
        let yaml = r#"
logging:
  receivers:
    sys:
      type: syslog
      listen_port: 99999
"#;
        let err = error(yaml, Platform::Linux);
        assert!(matches!(
            &err,
            ConfgenError::InvalidParameter { param, .. } if param == "listen_port"
        ));
    }

    #[test]
    fn test_requires_other_parameter() {
        let yaml = r#"
logging:
  processors:
    json:
      type: parse_json
      time_format: "%Y-%m-%d"
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging processor \"json\" has invalid parameter \"time_format\": requires parameter \"time_key\" to be set"
        );
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
logging:
  receivers:
    r1: {type: files, include_paths: [/a.log]}
  processors:
    json: {type: parse_json, time_key: null}
  service:
    pipelines:
      p1: {receivers: [r1], processors: [json]}
metrics:
  receivers:
    host: {type: hostmetrics}
  service:
    pipelines:
      system: {receivers: [host]}
"#;
        let config = validate(yaml, Platform::Linux).unwrap();
        let json = config.logging().processor("json").unwrap();
        assert_eq!(json.field(), "message");
        assert_eq!(json.time_key(), None);
        let host = config.metrics().receiver("host").unwrap();
        assert_eq!(host.collection_interval(), "60s");
    }

    #[test]
    fn test_collection_interval_minimum() {
        let yaml = r#"
metrics:
  receivers:
    host: {type: hostmetrics, collection_interval: 5s}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "metrics receiver \"host\" has invalid parameter \"collection_interval\": duration 5s is below the minimum of 10s"
        );
    }

    #[test]
    fn test_invalid_identifier() {
        let yaml = r#"
logging:
  receivers:
    "my app": {type: files, include_paths: [/a.log]}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(err.kind(), "InvalidIdentifierError");
        assert_eq!(
            err.to_string(),
            "logging receiver id \"my app\" may only contain letters, digits, '_' and '-'"
        );
    }

    #[test]
    fn test_reserved_identifier_prefix() {
        let yaml = r#"
logging:
  processors:
    "lib:mine": {type: parse_json}
"#;
        let err = error(yaml, Platform::Linux);
        assert_eq!(
            err.to_string(),
            "logging processor id \"lib:mine\" must not start with the reserved prefix \"lib:\""
        );
    }

    #[test]
    fn test_logging_errors_reported_before_metrics() {
        let yaml = r#"
metrics:
  receivers:
    m1: {type: bogus}
logging:
  receivers:
    l1: {type: bogus}
"#;
        let err = error(yaml, Platform::Linux);
        assert!(matches!(err, ConfgenError::UnsupportedType { section: Section::Logging, .. }));
    }

    #[test]
    fn test_types_checked_before_parameters() {
        let yaml = r#"
logging:
  receivers:
    r1: {type: files}
    r2: {type: bogus}
"#;
        let err = error(yaml, Platform::Linux);
        assert!(matches!(err, ConfgenError::UnsupportedType { id, .. } if id == "r2"));
    }

    #[test]
    fn test_substitute_registry() {
        let registry = Registry::new(vec![ComponentSpec {
            section: Section::Metrics,
            role: Role::Receiver,
            type_name: "iis",
            platforms: &[Platform::Linux],
            params: vec![ParameterSpec::defaulted(
                "collection_interval",
                ParamKind::Duration { min_secs: 10 },
                "60s",
            )],
        }]);
        let config = YamlParser::parse(
            "metrics:\n  receivers:\n    web: {type: iis}\n  service:\n    pipelines:\n      p: {receivers: [web]}\n",
        )
        .unwrap();
        let validated = ConfigValidator::new(&registry, Platform::Linux)
            .validate(&config)
            .unwrap();
        assert!(matches!(
            validated.metrics().receiver("web"),
            Some(MetricsReceiver::Iis(_))
        ));
    }
}
