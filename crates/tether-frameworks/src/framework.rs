//! Detectable web frameworks

use std::fmt;
use std::sync::Arc;

use tether_core::Config;

/// Predicate deciding whether a framework is in use
pub type MatchFn = dyn Fn(&Config) -> bool + Send + Sync;

/// Web framework name used when nothing matches
pub const UNKNOWN_FRAMEWORK: &str = "Unknown";

/// One web framework the detector can recognise.
///
/// Specific UI kits and meta-frameworks should get a lower `priority` than
/// the generic framework they build on, so they are picked first when both
/// match.
#[derive(Clone)]
pub struct FrameworkConfig {
    name: String,
    web_dir: String,
    priority: i32,
    is_match: Arc<MatchFn>,
}

impl FrameworkConfig {
    pub fn new<F>(name: impl Into<String>, web_dir: impl Into<String>, priority: i32, is_match: F) -> Self
    where
        F: Fn(&Config) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            web_dir: web_dir.into(),
            priority,
            is_match: Arc::new(is_match),
        }
    }

    /// Framework matched when the app depends on `package`
    pub fn for_dependency(
        name: impl Into<String>,
        web_dir: impl Into<String>,
        priority: i32,
        package: impl Into<String>,
    ) -> Self {
        let package = package.into();
        Self::new(name, web_dir, priority, move |config| {
            depends_on(config, &package)
        })
    }

    /// Fallback used when no registered framework matches
    pub fn unknown() -> Self {
        Self::new(
            UNKNOWN_FRAMEWORK,
            tether_core::config::defaults::DEFAULT_WEB_DIR,
            i32::MAX,
            |_| false,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Conventional web output directory of the framework
    pub fn web_dir(&self) -> &str {
        &self.web_dir
    }

    /// Lower values are evaluated first
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether this framework is in use by the configured app
    pub fn is_match(&self, config: &Config) -> bool {
        (self.is_match)(config)
    }
}

impl fmt::Debug for FrameworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkConfig")
            .field("name", &self.name)
            .field("web_dir", &self.web_dir)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Whether the app's package.json lists `package` as a dependency or
/// dev dependency
pub fn depends_on(config: &Config, package: &str) -> bool {
    config.app.package.has_dependency(package)
}
