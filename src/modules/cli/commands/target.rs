//! Target platform and host arguments shared by commands

use clap::Args;
use confgen_core::{HostInfo, PlatformDefaults};
use confgen_types::Platform;

#[cfg(windows)]
const HOST_PLATFORM: &str = "windows";
#[cfg(not(windows))]
const HOST_PLATFORM: &str = "linux";

/// Target platform, host descriptors and directory overrides
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Platform to validate and generate for
    #[arg(long, default_value = HOST_PLATFORM)]
    pub platform: Platform,

    /// Host platform name reported to the backends (e.g. debian)
    #[arg(long, default_value = "unknown")]
    pub host_platform: String,

    /// Host platform version reported to the backends (e.g. 11)
    #[arg(long, default_value = "unknown")]
    pub host_version: String,

    /// Override the agent log directory
    #[arg(long)]
    pub logs_dir: Option<String>,

    /// Override the agent state directory
    #[arg(long)]
    pub state_dir: Option<String>,
}

impl TargetArgs {
    /// Host descriptors for the target platform
    pub fn host(&self) -> HostInfo {
        HostInfo::new(self.platform, &self.host_platform, &self.host_version)
    }

    /// Standard directories for the platform with any overrides applied
    pub fn defaults(&self) -> PlatformDefaults {
        let mut defaults = PlatformDefaults::standard(self.host());
        if let Some(logs_dir) = &self.logs_dir {
            defaults = defaults.with_logs_dir(logs_dir);
        }
        if let Some(state_dir) = &self.state_dir {
            defaults = defaults.with_state_dir(state_dir);
        }
        defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_with_overrides() {
        let args = TargetArgs {
            platform: Platform::Linux,
            host_platform: "debian".into(),
            host_version: "11".into(),
            logs_dir: Some("/tmp/logs".into()),
            state_dir: None,
        };
        let defaults = args.defaults();
        assert_eq!(defaults.logs_dir, "/tmp/logs");
        assert_eq!(defaults.state_dir, "/var/lib/google-cloud-ops-agent/fluent-bit");
        assert_eq!(defaults.host.platform, "debian");
    }
}
