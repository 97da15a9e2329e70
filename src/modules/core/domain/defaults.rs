//! Caller-supplied platform defaults and host descriptors

use confgen_types::Platform;
use serde::{Deserialize, Serialize};

/// Host descriptors discovered by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Operating system family
    pub os: Platform,

    /// Platform (distribution or edition) name, e.g. `debian`
    pub platform: String,

    /// Platform version, e.g. `11`
    pub platform_version: String,
}

impl HostInfo {
    /// Create host descriptors
    pub fn new(
        os: Platform,
        platform: impl Into<String>,
        platform_version: impl Into<String>,
    ) -> Self {
        Self {
            os,
            platform: platform.into(),
            platform_version: platform_version.into(),
        }
    }

    /// User agent advertised to the export destination by `product`
    pub fn user_agent(&self, product: &str) -> String {
        format!(
            "{}/latest (Platform={};ShortName={};ShortVersion={})",
            product, self.os, self.platform, self.platform_version
        )
    }
}

/// Defaults for one generation invocation.
///
/// Built once by the caller and passed by reference to every generator; the
/// generators never modify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDefaults {
    /// Directory the agent and its subagents log to
    pub logs_dir: String,

    /// Directory holding persistent subagent state
    pub state_dir: String,

    /// Host descriptors
    pub host: HostInfo,
}

impl PlatformDefaults {
    /// Create defaults from explicit directories
    pub fn new(logs_dir: impl Into<String>, state_dir: impl Into<String>, host: HostInfo) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            state_dir: state_dir.into(),
            host,
        }
    }

    /// Conventional directories for the host's operating system
    pub fn standard(host: HostInfo) -> Self {
        let (logs_dir, state_dir) = match host.os {
            Platform::Linux => (
                "/var/log/google-cloud-ops-agent/subagents",
                "/var/lib/google-cloud-ops-agent/fluent-bit",
            ),
            Platform::Windows => (
                r"C:\ProgramData\Google\Cloud Operations\Ops Agent\log",
                r"C:\ProgramData\Google\Cloud Operations\Ops Agent\run",
            ),
        };
        Self::new(logs_dir, state_dir, host)
    }

    /// Override the log directory
    pub fn with_logs_dir(mut self, logs_dir: impl Into<String>) -> Self {
        self.logs_dir = logs_dir.into();
        self
    }

    /// Override the state directory
    pub fn with_state_dir(mut self, state_dir: impl Into<String>) -> Self {
        self.state_dir = state_dir.into();
        self
    }

    /// Target platform
    pub fn platform(&self) -> Platform {
        self.host.os
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent() {
        let host = HostInfo::new(Platform::Linux, "debian", "11");
        assert_eq!(
            host.user_agent("ops-agent-logging"),
            "ops-agent-logging/latest (Platform=linux;ShortName=debian;ShortVersion=11)"
        );
    }

    #[test]
    fn test_defaults_platform() {
        let defaults = PlatformDefaults::new(
            "/var/log/agent",
            "/var/lib/agent",
            HostInfo::new(Platform::Windows, "win", "2019"),
        );
        assert_eq!(defaults.platform(), Platform::Windows);
    }

    #[test]
    fn test_standard_defaults() {
        let linux = PlatformDefaults::standard(HostInfo::new(Platform::Linux, "debian", "11"));
        assert_eq!(linux.logs_dir, "/var/log/google-cloud-ops-agent/subagents");
        assert_eq!(linux.state_dir, "/var/lib/google-cloud-ops-agent/fluent-bit");

        let windows = PlatformDefaults::standard(HostInfo::new(Platform::Windows, "win", "2019"))
            .with_state_dir(r"D:\agent\run");
        assert_eq!(
            windows.logs_dir,
            r"C:\ProgramData\Google\Cloud Operations\Ops Agent\log"
        );
        assert_eq!(windows.state_dir, r"D:\agent\run");
    }
}
