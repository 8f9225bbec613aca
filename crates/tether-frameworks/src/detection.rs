//! Framework detection
//!
//! Evaluates registered frameworks against a loaded [`Config`] in priority
//! order and picks the first one whose predicate matches.

use tether_core::Config;
use tracing::{debug, info, instrument};

use crate::framework::FrameworkConfig;

/// Ordered set of frameworks to check a project against
#[derive(Debug, Clone)]
pub struct FrameworkDetector {
    /// Registration order; ties in priority are resolved by it
    frameworks: Vec<FrameworkConfig>,
    default: FrameworkConfig,
}

impl FrameworkDetector {
    /// Create an empty detector falling back to [`FrameworkConfig::unknown`]
    pub fn new() -> Self {
        Self {
            frameworks: Vec::new(),
            default: FrameworkConfig::unknown(),
        }
    }

    /// Create a detector with the given frameworks, in registration order
    pub fn with_frameworks(frameworks: impl IntoIterator<Item = FrameworkConfig>) -> Self {
        let mut detector = Self::new();
        for framework in frameworks {
            detector.register(framework);
        }
        detector
    }

    /// Replace the fallback framework
    pub fn with_default(mut self, default: FrameworkConfig) -> Self {
        self.default = default;
        self
    }

    /// Register a framework
    pub fn register(&mut self, framework: FrameworkConfig) {
        debug!(
            framework = %framework.name(),
            priority = framework.priority(),
            "registering framework"
        );
        self.frameworks.push(framework);
    }

    /// Registered frameworks in evaluation order
    pub fn frameworks(&self) -> Vec<&FrameworkConfig> {
        let mut ordered: Vec<_> = self.frameworks.iter().collect();
        // Stable: equal priorities keep registration order
        ordered.sort_by_key(|f| f.priority());
        ordered
    }

    /// All matching frameworks in evaluation order
    pub fn matches(&self, config: &Config) -> Vec<&FrameworkConfig> {
        self.frameworks()
            .into_iter()
            .filter(|f| f.is_match(config))
            .collect()
    }

    /// The first matching framework, if any
    #[instrument(skip_all, fields(app = %config.app.app_id, framework_count = self.frameworks.len()))]
    pub fn detect(&self, config: &Config) -> Option<&FrameworkConfig> {
        let detected = self.frameworks().into_iter().find(|f| f.is_match(config));
        match detected {
            Some(framework) => info!(
                framework = %framework.name(),
                web_dir = %framework.web_dir(),
                "framework detected"
            ),
            None => debug!("no framework matched"),
        }
        detected
    }

    /// The first matching framework, or the fallback when none matches
    pub fn resolve(&self, config: &Config) -> &FrameworkConfig {
        self.detect(config).unwrap_or(&self.default)
    }

    /// The fallback framework
    pub fn default_framework(&self) -> &FrameworkConfig {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }
}

impl Default for FrameworkDetector {
    fn default() -> Self {
        Self::new()
    }
}
