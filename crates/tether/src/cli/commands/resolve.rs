//! Resolving the deferred config fields for display

use serde::Serialize;
use tether_core::{Config, ProjectPath, ResolveError};
use tracing::debug;

/// Outcome of awaiting one deferred field
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedField {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub hint: Option<String>,
}

impl ResolvedField {
    fn new(name: &'static str, result: Result<String, ResolveError>) -> Self {
        match result {
            Ok(value) => Self {
                name,
                value: Some(value),
                error: None,
                hint: None,
            },
            Err(e) => {
                let hint = match &e {
                    ResolveError::ToolNotFound { hint, .. } => Some(hint.clone()),
                    ResolveError::PathNotFound { .. } => {
                        Some("Add the native platform to the project first".to_string())
                    }
                    ResolveError::Failed(_) => None,
                };
                Self {
                    name,
                    value: None,
                    error: Some(e.to_string()),
                    hint,
                }
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }
}

/// Await every deferred field of `config` concurrently
pub async fn resolve_deferred(config: &Config) -> Vec<ResolvedField> {
    debug!(
        studio_pending = config.android.studio_path.state().is_pending(),
        pod_pending = config.ios.pod_path.state().is_pending(),
        "resolving deferred fields"
    );

    let (studio_path, pod_path, web_dir, workspace_dir) = tokio::join!(
        config.android.studio_path.get(),
        config.ios.pod_path.get(),
        config.ios.web_dir.get(),
        config.ios.native_xcode_workspace_dir.get(),
    );

    vec![
        ResolvedField::new(
            "android.studioPath",
            studio_path.map(|p| p.display().to_string()),
        ),
        ResolvedField::new("ios.podPath", pod_path.map(|p| p.display().to_string())),
        ResolvedField::new("ios.webDir", web_dir.map(|p| display_abs(&p))),
        ResolvedField::new(
            "ios.nativeXcodeWorkspaceDir",
            workspace_dir.map(|p| display_abs(&p)),
        ),
    ]
}

/// Run `future` to completion on a fresh runtime
pub fn block_on<F: std::future::Future>(future: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(future))
}

fn display_abs(path: &ProjectPath) -> String {
    path.abs().display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_failed_field_carries_hint() {
        let field = ResolvedField::new(
            "ios.podPath",
            Err(ResolveError::tool_not_found("pod", "Install CocoaPods")),
        );
        assert!(!field.is_resolved());
        assert_eq!(field.hint.as_deref(), Some("Install CocoaPods"));
        assert!(field.error.unwrap().contains("'pod'"));
    }

    #[test]
    fn test_resolved_field_serializes_value_only() {
        let field = ResolvedField::new("android.studioPath", Ok("/opt/studio".to_string()));
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "android.studioPath", "value": "/opt/studio"})
        );

        let missing = ResolvedField::new(
            "ios.webDir",
            Err(ResolveError::path_not_found("iOS native target", PathBuf::from("/app/ios/App/App"))),
        );
        assert!(missing.hint.is_some());
    }

    #[test]
    fn test_resolve_missing_native_projects() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"name": "web-app", "version": "1.0.0"}"#,
        )
        .unwrap();
        let config = tether_core::ConfigLoader::new(temp.path())
            .cli_root(temp.path())
            .load_unvalidated()
            .unwrap();

        let fields = block_on(resolve_deferred(&config)).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "android.studioPath",
                "ios.podPath",
                "ios.webDir",
                "ios.nativeXcodeWorkspaceDir"
            ]
        );
        // No ios/ directory was generated
        assert!(!fields[2].is_resolved());
        assert!(!fields[3].is_resolved());
        assert!(config.ios.web_dir.state().is_failed());
    }
}
