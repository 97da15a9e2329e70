//! Platform resolution
//!
//! Which backends drive telemetry on each platform, and the preflight check
//! every generator runs before emitting anything.

use confgen_core::{ConfgenError, HostInfo, Result, ValidatedConfig};
use confgen_types::{Backend, Platform};

const LINUX_BACKENDS: &[Backend] = &[Backend::FluentBit, Backend::Collectd];
const WINDOWS_BACKENDS: &[Backend] = &[Backend::FluentBit, Backend::Otel];

/// Backends active on `platform`, in generation order
pub fn capabilities(platform: Platform) -> &'static [Backend] {
    match platform {
        Platform::Linux => LINUX_BACKENDS,
        Platform::Windows => WINDOWS_BACKENDS,
    }
}

/// Returns true if `backend` runs on `platform`
pub fn is_active(platform: Platform, backend: Backend) -> bool {
    capabilities(platform).contains(&backend)
}

/// The metrics backend active on `platform`
pub fn metrics_backend(platform: Platform) -> Option<Backend> {
    capabilities(platform)
        .iter()
        .copied()
        .find(Backend::is_metrics)
}

/// Refuse to generate for a backend the platform does not run
pub fn ensure_active(backend: Backend, platform: Platform) -> Result<()> {
    if !is_active(platform, backend) {
        return Err(ConfgenError::generation(
            backend,
            format!("{} is not used on {}", backend, platform),
        ));
    }
    Ok(())
}

/// Like [`ensure_active`], and also refuse when the configuration was
/// validated for a different OS than the host's
pub fn ensure_applicable(backend: Backend, config: &ValidatedConfig, host: &HostInfo) -> Result<()> {
    let platform = config.platform();
    if platform != host.os {
        return Err(ConfgenError::generation(
            backend,
            format!(
                "configuration was validated for {} but the host runs {}",
                platform, host.os
            ),
        ));
    }
    ensure_active(backend, platform)
}
