//! Generate command implementation
//!
//! Validates the unified configuration for the target platform and writes
//! every active backend's configuration file into the output directory.

use clap::Args;
use confgen_core::{ConfgenError, Registry};
use confgen_generator::{GeneratedFile, GeneratorSet};
use confgen_parser::{parse_file, validate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::TargetArgs;

/// Generate command arguments
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Output directory
    #[arg(short = 'o', long, default_value = "generated")]
    pub out: String,

    /// Clean output directory before generating
    #[arg(long)]
    pub clean_dir: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

impl GenerateCommand {
    /// Execute the generate command, returning the written paths
    pub fn execute(&self, config_path: &str) -> Result<Vec<PathBuf>, ConfgenError> {
        info!(
            platform = %self.target.platform,
            "Generating configuration from: {}", config_path
        );

        let config = parse_file(config_path)?;
        let validated = validate(&config, &Registry::builtin(), self.target.platform)?;
        let defaults = self.target.defaults();

        // Everything is rendered before the first write so a failing backend
        // leaves the output directory untouched
        let files = GeneratorSet::for_platform(self.target.platform)
            .generate_all(&validated, &defaults)?;

        let out_path = Path::new(self.out.as_str());
        if self.clean_dir && out_path.exists() {
            fs::remove_dir_all(out_path)?;
        }
        fs::create_dir_all(out_path)?;

        let written = Self::write_files(out_path, &files)?;
        info!("Generated {} file(s) in {}", written.len(), out_path.display());
        Ok(written)
    }

    fn write_files(out_path: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, ConfgenError> {
        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = out_path.join(file.name);
            fs::write(&path, &file.contents)?;
            debug!(bytes = file.contents.len(), "Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_types::Platform;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
logging:
  receivers:
    app:
      type: files
      include_paths: [/var/log/app/*.log]
  service:
    pipelines:
      default:
        receivers: [app]
metrics:
  receivers:
    host:
      type: hostmetrics
      collection_interval: 30s
  service:
    pipelines:
      system:
        receivers: [host]
"#;

    fn command(out: &Path, platform: Platform) -> GenerateCommand {
        GenerateCommand {
            out: out.to_string_lossy().into_owned(),
            clean_dir: false,
            target: TargetArgs {
                platform,
                host_platform: "test".into(),
                host_version: "1".into(),
                logs_dir: None,
                state_dir: None,
            },
        }
    }

    fn write_config(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().join("config.yaml");
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_generate_linux_files() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, CONFIG);
        let out = dir.path().join("out");

        let written = command(&out, Platform::Linux).execute(&config).unwrap();
        assert_eq!(written.len(), 3);
        assert!(out.join("fluent_bit_main.conf").exists());
        assert!(out.join("fluent_bit_parser.conf").exists());

        let collectd = fs::read_to_string(out.join("collectd.conf")).unwrap();
        assert!(collectd.contains("Interval 30"));
    }

    #[test]
    fn test_generate_windows_files() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, CONFIG);
        let out = dir.path().join("out");

        command(&out, Platform::Windows).execute(&config).unwrap();
        assert!(out.join("otel.yaml").exists());
        assert!(!out.join("collectd.conf").exists());
    }

    #[test]
    fn test_invalid_config_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = write_config(
            &dir,
            "logging:\n  service:\n    pipelines:\n      p1:\n        receivers: [missing]\n",
        );
        let out = dir.path().join("out");

        let err = command(&out, Platform::Linux).execute(&config).unwrap_err();
        assert_eq!(err.kind(), "UndefinedReferenceError");
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let missing = dir.path().join("absent.yaml");

        let err = command(&out, Platform::Linux)
            .execute(&missing.to_string_lossy())
            .unwrap_err();
        assert!(matches!(err, ConfgenError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_clean_dir_removes_stale_files() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, CONFIG);
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.conf"), "old").unwrap();

        let mut cmd = command(&out, Platform::Linux);
        cmd.clean_dir = true;
        cmd.execute(&config).unwrap();
        assert!(!out.join("stale.conf").exists());
        assert!(out.join("collectd.conf").exists());
    }
}
