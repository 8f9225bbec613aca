//! Host operating system detection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Host operating system the CLI runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    #[default]
    Unknown,
    Mac,
    Windows,
    Linux,
}

impl Os {
    /// Operating system of the running process
    pub fn current() -> Self {
        Self::from_platform(std::env::consts::OS)
    }

    /// Map a platform identifier to an `Os`.
    ///
    /// Accepts both Rust (`macos`) and Node-style (`darwin`, `win32`) names.
    /// Anything unrecognised is `Unknown`.
    pub fn from_platform(platform: &str) -> Self {
        match platform.to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "mac" => Self::Mac,
            "windows" | "win32" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Mac => "mac",
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_platform(s))
    }
}
