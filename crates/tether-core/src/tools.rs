//! Locating native toolchains and probing generated native projects
//!
//! Everything here runs inside a [`Deferred`](crate::deferred::Deferred)
//! resolution, so failures are reported as [`ResolveError`] values rather
//! than aborting config loading.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::defaults;
use crate::config::ProjectPath;
use crate::error::ResolveError;
use crate::os::Os;

/// Finds native tools the platform builders need
#[async_trait]
pub trait ToolLocator: Send + Sync {
    /// Android Studio executable or application bundle.
    ///
    /// `configured` is an explicit location from the environment or the
    /// external config and takes precedence over discovery.
    async fn android_studio(
        &self,
        os: Os,
        configured: Option<PathBuf>,
    ) -> Result<PathBuf, ResolveError>;

    /// CocoaPods `pod` executable
    async fn cocoapods(&self, configured: Option<PathBuf>) -> Result<PathBuf, ResolveError>;
}

/// Looks in well-known install locations, then on `PATH`
#[derive(Debug, Clone, Default)]
pub struct SystemToolLocator;

impl SystemToolLocator {
    pub fn new() -> Self {
        Self
    }

    /// Well-known Android Studio install locations for a host
    pub fn android_studio_candidates(os: Os) -> Vec<PathBuf> {
        match os {
            Os::Mac => vec![PathBuf::from("/Applications/Android Studio.app")],
            Os::Windows => vec![PathBuf::from(
                r"C:\Program Files\Android\Android Studio\bin\studio64.exe",
            )],
            Os::Linux => {
                let mut candidates = vec![
                    PathBuf::from("/usr/local/android-studio/bin/studio.sh"),
                    PathBuf::from("/opt/android-studio/bin/studio.sh"),
                ];
                if let Some(home) = dirs::home_dir() {
                    candidates.push(home.join("android-studio/bin/studio.sh"));
                }
                candidates
            }
            Os::Unknown => Vec::new(),
        }
    }
}

#[async_trait]
impl ToolLocator for SystemToolLocator {
    #[instrument(skip(self))]
    async fn android_studio(
        &self,
        os: Os,
        configured: Option<PathBuf>,
    ) -> Result<PathBuf, ResolveError> {
        if let Some(path) = configured {
            return if exists(&path).await {
                Ok(path)
            } else {
                Err(ResolveError::path_not_found("Android Studio", path))
            };
        }

        for candidate in Self::android_studio_candidates(os) {
            if exists(&candidate).await {
                debug!(path = %candidate.display(), "found Android Studio");
                return Ok(candidate);
            }
        }

        for name in ["studio", "studio.sh", "android-studio"] {
            if let Some(path) = which_async(name).await? {
                return Ok(path);
            }
        }

        Err(ResolveError::tool_not_found(
            "Android Studio",
            format!(
                "Install Android Studio or set {} to its location",
                defaults::ENV_ANDROID_STUDIO_PATH
            ),
        ))
    }

    #[instrument(skip(self))]
    async fn cocoapods(&self, configured: Option<PathBuf>) -> Result<PathBuf, ResolveError> {
        let name = configured.unwrap_or_else(|| PathBuf::from(defaults::ios::POD_EXECUTABLE));

        // A bare command name is looked up on PATH, anything else must exist
        if name.components().count() > 1 || name.is_absolute() {
            return if exists(&name).await {
                Ok(name)
            } else {
                Err(ResolveError::path_not_found("CocoaPods", name))
            };
        }

        let lookup = name.to_string_lossy().into_owned();
        which_async(&lookup).await?.ok_or_else(|| {
            ResolveError::tool_not_found(
                lookup,
                format!(
                    "Install CocoaPods (gem install cocoapods) or set {}",
                    defaults::ENV_COCOAPODS_PATH
                ),
            )
        })
    }
}

/// Web asset directory of the iOS native target.
///
/// Resolves once the native target directory exists; the public directory
/// itself is created by the copy step and need not exist yet.
#[instrument(skip_all, fields(target = %native_target_dir.abs().display()))]
pub async fn probe_ios_web_dir(native_target_dir: ProjectPath) -> Result<ProjectPath, ResolveError> {
    if !exists(native_target_dir.abs()).await {
        return Err(ResolveError::path_not_found(
            "iOS native target",
            native_target_dir.abs(),
        ));
    }
    Ok(native_target_dir.child(defaults::ios::WEB_DIR))
}

/// Xcode workspace inside the native project directory.
///
/// Picks the first `*.xcworkspace` by name, falling back to the default name
/// when none has been generated yet.
#[instrument(skip_all, fields(project = %native_project_dir.abs().display()))]
pub async fn probe_xcode_workspace(
    native_project_dir: ProjectPath,
) -> Result<ProjectPath, ResolveError> {
    let mut entries = match tokio::fs::read_dir(native_project_dir.abs()).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResolveError::path_not_found(
                "iOS native project",
                native_project_dir.abs(),
            ));
        }
        Err(e) => return Err(ResolveError::Failed(e.to_string())),
    };

    let mut workspaces = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ResolveError::Failed(e.to_string()))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".xcworkspace") {
            workspaces.push(name);
        }
    }
    workspaces.sort();

    let name = workspaces
        .into_iter()
        .next()
        .unwrap_or_else(|| defaults::ios::NATIVE_XCODE_WORKSPACE_DIR.to_string());
    debug!(workspace = %name, "resolved Xcode workspace");
    Ok(native_project_dir.child(name))
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn which_async(name: &str) -> Result<Option<PathBuf>, ResolveError> {
    let name = name.to_string();
    tokio::task::spawn_blocking(move || which::which(name).ok())
        .await
        .map_err(|e| ResolveError::Failed(e.to_string()))
}
