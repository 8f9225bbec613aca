//! package.json metadata

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// The subset of package.json the CLI relies on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Dependencies. A `null` version is kept but counts as not declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<HashMap<String, Option<String>>>,

    /// Dev dependencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<HashMap<String, Option<String>>>,

    /// Preserve other fields
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

impl PackageJson {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Load package.json from path
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "reading package.json");
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e),
        })?;

        Self::parse(&content)
    }

    /// Parse package.json content
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("package.json: {}", e)).into())
    }

    /// Declared version of a dependency, checking dependencies before
    /// devDependencies
    pub fn dependency_version(&self, name: &str) -> Option<&str> {
        [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .flatten()
            .find_map(|deps| deps.get(name)?.as_deref())
    }

    /// Whether the package depends on `name` in any form
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependency_version(name).is_some()
    }
}
