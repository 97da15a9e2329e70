//! Generator trait definition

use confgen_core::{PlatformDefaults, Result, ValidatedConfig};
use confgen_types::Backend;

/// One generated configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name the backend expects, e.g. `collectd.conf`
    pub name: &'static str,

    /// File contents
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(name: &'static str, contents: impl Into<String>) -> Self {
        Self {
            name,
            contents: contents.into(),
        }
    }
}

/// Trait for backend configuration generators
///
/// Each backend implements this trait so callers can drive every generator a
/// platform needs through one interface. Implementations are pure: the same
/// validated configuration and defaults always yield the same files.
pub trait ConfigGenerator: Send + Sync {
    /// Backend this generator writes configuration for
    fn backend(&self) -> Backend;

    /// Generate the backend's configuration files
    fn generate(
        &self,
        config: &ValidatedConfig,
        defaults: &PlatformDefaults,
    ) -> Result<Vec<GeneratedFile>>;
}
