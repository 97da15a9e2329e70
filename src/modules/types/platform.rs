//! Target platform definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system family the generated configuration targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux distributions
    Linux,
    /// Windows Server and desktop
    Windows,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" | "win" => Ok(Platform::Windows),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

impl Platform {
    /// Path separator used in paths written for this platform.
    ///
    /// Generated files must not depend on the OS the generator itself runs on,
    /// so paths are joined by hand instead of through `std::path`.
    pub fn path_separator(&self) -> char {
        match self {
            Platform::Linux => '/',
            Platform::Windows => '\\',
        }
    }

    /// Join a base directory and a relative path with this platform's separator
    pub fn join_path(&self, base: &str, rest: &str) -> String {
        let sep = self.path_separator();
        let base = base.trim_end_matches(sep);
        format!("{}{}{}", base, sep, rest)
    }

    /// Returns true if `path` is absolute on this platform
    pub fn is_absolute_path(&self, path: &str) -> bool {
        match self {
            Platform::Linux => path.starts_with('/'),
            Platform::Windows => {
                let bytes = path.as_bytes();
                path.starts_with("\\\\")
                    || path.starts_with('/')
                    || (bytes.len() >= 3
                        && bytes[0].is_ascii_alphabetic()
                        && bytes[1] == b':'
                        && (bytes[2] == b'\\' || bytes[2] == b'/'))
            }
        }
    }
}
