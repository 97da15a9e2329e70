//! Generator selection by platform

use confgen_core::{PlatformDefaults, Result, ValidatedConfig};
use confgen_types::{Backend, Platform};
use tracing::info;

use crate::collectd::CollectdGenerator;
use crate::fluentbit::FluentBitGenerator;
use crate::otel::OtelGenerator;
use crate::platform::capabilities;
use crate::traits::{ConfigGenerator, GeneratedFile};

/// The generators one platform runs, in capability table order
pub struct GeneratorSet {
    generators: Vec<Box<dyn ConfigGenerator>>,
}

impl GeneratorSet {
    /// Every generator active on `platform`
    pub fn for_platform(platform: Platform) -> Self {
        let generators = capabilities(platform)
            .iter()
            .map(|backend| Self::create_generator(*backend))
            .collect();
        Self { generators }
    }

    fn create_generator(backend: Backend) -> Box<dyn ConfigGenerator> {
        match backend {
            Backend::FluentBit => Box::new(FluentBitGenerator),
            Backend::Collectd => Box::new(CollectdGenerator),
            Backend::Otel => Box::new(OtelGenerator),
        }
    }

    /// Backends in generation order
    pub fn backends(&self) -> Vec<Backend> {
        self.generators.iter().map(|g| g.backend()).collect()
    }

    /// Run every generator; the first failure aborts with no partial output
    pub fn generate_all(
        &self,
        config: &ValidatedConfig,
        defaults: &PlatformDefaults,
    ) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::new();
        for generator in &self.generators {
            let generated = generator.generate(config, defaults)?;
            info!(
                backend = %generator.backend(),
                files = generated.len(),
                "generated configuration"
            );
            files.extend(generated);
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_core::{ConfgenError, HostInfo, Registry};

    const CONFIG: &str = r#"
logging:
  receivers:
    r1: {type: files, include_paths: [/var/log/app.log]}
  service:
    pipelines:
      p1: {receivers: [r1]}
metrics:
  receivers:
    host: {type: hostmetrics}
  service:
    pipelines:
      system: {receivers: [host]}
"#;

    fn generate(platform: Platform) -> Result<Vec<GeneratedFile>> {
        let config = confgen_parser::load(CONFIG, &Registry::builtin(), platform).unwrap();
        let defaults = PlatformDefaults::standard(HostInfo::new(platform, "test", "1"));
        GeneratorSet::for_platform(platform).generate_all(&config, &defaults)
    }

    #[test]
    fn test_linux_files() {
        let files = generate(Platform::Linux).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["fluent_bit_main.conf", "fluent_bit_parser.conf", "collectd.conf"]
        );
        assert!(files[2].contents.contains("Interval 60"));
    }

    #[test]
    fn test_windows_files() {
        let files = generate(Platform::Windows).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["fluent_bit_main.conf", "fluent_bit_parser.conf", "otel.yaml"]
        );
        assert!(files[2].contents.contains("hostmetrics/host"));
    }

    #[test]
    fn test_backends() {
        assert_eq!(
            GeneratorSet::for_platform(Platform::Windows).backends(),
            vec![Backend::FluentBit, Backend::Otel]
        );
    }

    #[test]
    fn test_generators_share_config_across_threads() {
        let config = confgen_parser::load(CONFIG, &Registry::builtin(), Platform::Linux).unwrap();
        let defaults = PlatformDefaults::standard(HostInfo::new(Platform::Linux, "test", "1"));
        let set = GeneratorSet::for_platform(Platform::Linux);
        let expected = set.generate_all(&config, &defaults).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| set.generate_all(&config, &defaults).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_first_failure_aborts() {
        let config = confgen_parser::load(CONFIG, &Registry::builtin(), Platform::Linux).unwrap();
        let defaults = PlatformDefaults::standard(HostInfo::new(Platform::Windows, "win", "1"));
        let err = GeneratorSet::for_platform(Platform::Linux)
            .generate_all(&config, &defaults)
            .unwrap_err();
        assert!(matches!(err, ConfgenError::Generation { backend: Backend::FluentBit, .. }));
    }
}
