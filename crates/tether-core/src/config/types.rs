//! Configuration types

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::defaults;
use super::external::{ExtConfigType, ExternalConfig, PluginsConfig};
use super::options::{AndroidBuildOptions, IosBuildOptions};
use super::package::PackageJson;
use super::paths::ProjectPath;
use crate::deferred::Deferred;
use crate::os::Os;

/// Fully assembled configuration for one CLI invocation
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub android: AndroidConfig,
    pub ios: IosConfig,
    pub web: WebConfig,
    pub cli: CliConfig,
    pub app: AppConfig,

    /// Plugin-specific configuration keyed by plugin package name.
    /// `None` means no overrides are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginsConfig>,
}

/// A path pair together with the root it is resolved against
#[derive(Debug, Clone, Copy)]
pub struct PathPair<'a> {
    pub field: &'static str,
    pub root: &'a Path,
    pub path: &'a ProjectPath,
}

fn pair<'a>(field: &'static str, root: &'a Path, path: &'a ProjectPath) -> PathPair<'a> {
    PathPair { field, root, path }
}

impl Config {
    /// Configuration for one plugin. Unset `plugins` behaves as an empty map.
    pub fn plugin(&self, name: &str) -> Option<&serde_json::Value> {
        self.plugins.as_ref()?.get(name)
    }

    /// Names of plugins with configuration, in sorted order
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .flat_map(|plugins| plugins.keys())
            .map(String::as_str)
            .collect()
    }

    /// Copy for printing, with keystore passwords masked in both the
    /// resolved Android options and the external config snapshot
    pub fn redacted(&self) -> Self {
        let mut redacted = self.clone();
        redacted.android.build_options = self.android.build_options.redacted();
        redacted.app.ext_config = Arc::new(self.app.ext_config.redacted());
        redacted
    }

    /// Every synchronously known path pair with the root it must resolve
    /// against
    pub fn path_pairs(&self) -> Vec<PathPair<'_>> {
        let app_root = self.app.root_dir.as_path();
        let cli_root = self.cli.root_dir.as_path();
        let android_root = self.android.platform.platform_dir.abs();
        let ios_root = self.ios.platform.platform_dir.abs();

        vec![
            pair("app.webDir", app_root, &self.app.web_dir),
            pair("web.platformDir", app_root, &self.web.platform_dir),
            pair("cli.assetsDir", cli_root, &self.cli.assets_dir),
            pair(
                "cli.assets.android.platformTemplateArchive",
                cli_root,
                &self.cli.assets.android.platform_template_archive,
            ),
            pair(
                "cli.assets.android.cordovaPluginsTemplateArchive",
                cli_root,
                &self.cli.assets.android.cordova_plugins_template_archive,
            ),
            pair(
                "cli.assets.ios.platformTemplateArchive",
                cli_root,
                &self.cli.assets.ios.platform_template_archive,
            ),
            pair(
                "cli.assets.ios.cordovaPluginsTemplateArchive",
                cli_root,
                &self.cli.assets.ios.cordova_plugins_template_archive,
            ),
            pair("android.platformDir", app_root, &self.android.platform.platform_dir),
            pair("android.cordovaPluginsDir", android_root, &self.android.cordova_plugins_dir),
            pair("android.appDir", android_root, &self.android.app_dir),
            pair("android.srcDir", android_root, &self.android.src_dir),
            pair("android.srcMainDir", android_root, &self.android.src_main_dir),
            pair("android.webDir", android_root, &self.android.web_dir),
            pair("android.assetsDir", android_root, &self.android.assets_dir),
            pair("android.resDir", android_root, &self.android.res_dir),
            pair("android.buildOutputDir", android_root, &self.android.build_output_dir),
            pair("ios.platformDir", app_root, &self.ios.platform.platform_dir),
            pair("ios.cordovaPluginsDir", ios_root, &self.ios.cordova_plugins_dir),
            pair("ios.nativeProjectDir", ios_root, &self.ios.native_project_dir),
            pair("ios.nativeTargetDir", ios_root, &self.ios.native_target_dir),
            pair("ios.nativeXcodeProjDir", ios_root, &self.ios.native_xcode_proj_dir),
        ]
    }
}

/// Template archive locations for one native platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAssetsConfig {
    pub platform_template_archive: ProjectPath,
    pub cordova_plugins_template_archive: ProjectPath,
}

/// Per-platform template archives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliAssets {
    pub ios: PlatformAssetsConfig,
    pub android: PlatformAssetsConfig,
}

/// Where the CLI itself is installed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    pub root_dir: PathBuf,
    pub assets_dir: ProjectPath,
    pub assets: CliAssets,
    pub package: PackageJson,
    pub os: Os,
}

impl CliConfig {
    /// Standard layout below `root_dir`
    pub fn new(root_dir: impl Into<PathBuf>, package: PackageJson, os: Os) -> Self {
        use defaults::assets;

        let root_dir = root_dir.into();
        let assets_dir = ProjectPath::new(&root_dir, assets::ASSETS_DIR);
        let assets = CliAssets {
            android: PlatformAssetsConfig {
                platform_template_archive: assets_dir.child(assets::ANDROID_TEMPLATE),
                cordova_plugins_template_archive: assets_dir
                    .child(assets::ANDROID_CORDOVA_PLUGINS_TEMPLATE),
            },
            ios: PlatformAssetsConfig {
                platform_template_archive: assets_dir.child(assets::IOS_TEMPLATE),
                cordova_plugins_template_archive: assets_dir
                    .child(assets::IOS_CORDOVA_PLUGINS_TEMPLATE),
            },
        };

        Self {
            root_dir,
            assets_dir,
            assets,
            package,
            os,
        }
    }
}

/// The user's app
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub root_dir: PathBuf,
    pub app_id: String,
    pub app_name: String,
    pub web_dir: ProjectPath,
    pub package: PackageJson,
    pub ext_config_type: ExtConfigType,
    pub ext_config_name: String,
    pub ext_config_file_path: PathBuf,
    pub ext_config: Arc<ExternalConfig>,
}

/// Fields shared by every platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    pub name: String,
    pub platform_dir: ProjectPath,
}

impl PlatformConfig {
    pub fn new(app_root: &Path, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            platform_dir: ProjectPath::new(app_root, dir),
        }
    }
}

/// The web target has no settings beyond the shared ones
pub type WebConfig = PlatformConfig;

/// Uniform access to the shared platform fields
pub trait AsPlatform {
    fn platform(&self) -> &PlatformConfig;

    fn name(&self) -> &str {
        &self.platform().name
    }

    fn platform_dir(&self) -> &ProjectPath {
        &self.platform().platform_dir
    }
}

impl AsPlatform for PlatformConfig {
    fn platform(&self) -> &PlatformConfig {
        self
    }
}

impl AsPlatform for AndroidConfig {
    fn platform(&self) -> &PlatformConfig {
        &self.platform
    }
}

impl AsPlatform for IosConfig {
    fn platform(&self) -> &PlatformConfig {
        &self.platform
    }
}

/// Android native project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidConfig {
    #[serde(flatten)]
    pub platform: PlatformConfig,
    pub cordova_plugins_dir: ProjectPath,
    /// Android Studio executable, located on demand
    #[serde(skip)]
    pub studio_path: Deferred<PathBuf>,
    pub min_version: String,
    pub app_dir: ProjectPath,
    pub src_dir: ProjectPath,
    pub src_main_dir: ProjectPath,
    pub web_dir: ProjectPath,
    pub assets_dir: ProjectPath,
    pub res_dir: ProjectPath,
    /// Unflavored debug output. Use [`AndroidConfig::flavor_output_dir`] for
    /// other variants.
    pub build_output_dir: ProjectPath,
    /// Deprecated: debug APK name for the configured flavor. Use
    /// [`AndroidConfig::flavor_apk_name`] for other variants.
    pub apk_name: String,
    pub flavor: String,
    pub build_options: AndroidBuildOptions,
}

impl AndroidConfig {
    /// Deprecated: only correct for the unflavored debug build. Use
    /// [`AndroidConfig::flavor_output_dir`].
    pub fn build_output_dir_abs(&self) -> &Path {
        self.build_output_dir.abs()
    }

    /// Gradle APK output directory for a flavor and variant (`debug`,
    /// `release`)
    pub fn flavor_output_dir(&self, flavor: &str, variant: &str) -> ProjectPath {
        let outputs = self.app_dir.child(defaults::android::BUILD_OUTPUT_DIR);
        if flavor.is_empty() {
            outputs.child(variant)
        } else {
            outputs.child(flavor).child(variant)
        }
    }

    /// Gradle APK file name for a flavor and variant
    pub fn flavor_apk_name(&self, flavor: &str, variant: &str) -> String {
        let app = self
            .app_dir
            .rel()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(defaults::android::APP_DIR);
        if flavor.is_empty() {
            format!("{}-{}.apk", app, variant)
        } else {
            format!("{}-{}-{}.apk", app, flavor, variant)
        }
    }
}

/// iOS native project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IosConfig {
    #[serde(flatten)]
    pub platform: PlatformConfig,
    pub cordova_plugins_dir: ProjectPath,
    pub min_version: String,
    /// CocoaPods executable, located on demand
    #[serde(skip)]
    pub pod_path: Deferred<PathBuf>,
    pub scheme: String,
    /// Web asset directory inside the native target, probed on demand
    #[serde(skip)]
    pub web_dir: Deferred<ProjectPath>,
    pub native_project_dir: ProjectPath,
    pub native_target_dir: ProjectPath,
    pub native_xcode_proj_dir: ProjectPath,
    /// Xcode workspace, probed on demand
    #[serde(skip)]
    pub native_xcode_workspace_dir: Deferred<ProjectPath>,
    pub build_options: IosBuildOptions,
}
