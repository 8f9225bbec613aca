//! Configuration loading

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::deferred::Deferred;
use crate::error::{ConfigError, Result};
use crate::os::Os;
use crate::tools::{probe_ios_web_dir, probe_xcode_workspace, SystemToolLocator, ToolLocator};

use super::defaults::{self, android, ios};
use super::external::{ExtConfigType, ExternalConfig};
use super::package::PackageJson;
use super::paths::{resolve_path, ProjectPath};
use super::types::{AndroidConfig, AppConfig, CliConfig, Config, IosConfig, PlatformConfig};
use super::validation::validate_config;

/// Turns a JavaScript or TypeScript config file into JSON.
///
/// The CLI cannot execute scripts itself; hosts that can plug an evaluator
/// into [`ConfigLoader::evaluator`].
pub trait ExtConfigEvaluator: Send + Sync {
    fn evaluate(&self, path: &Path, kind: ExtConfigType) -> Result<serde_json::Value>;
}

/// Evaluator used when none is configured: rejects script configs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScriptEvaluator;

impl ExtConfigEvaluator for NoScriptEvaluator {
    fn evaluate(&self, path: &Path, kind: ExtConfigType) -> Result<serde_json::Value> {
        Err(ConfigError::UnsupportedConfigType {
            path: path.to_path_buf(),
            kind: kind.to_string(),
            reason: format!(
                "no script evaluator available, use {} instead",
                defaults::ext_config_file_name(ExtConfigType::Json)
            ),
        }
        .into())
    }
}

/// Find the external config file in `app_root`.
///
/// Flavours are checked in [`defaults::EXT_CONFIG_SEARCH_ORDER`]; the first
/// match wins. Parent directories are not searched.
pub fn find_ext_config(app_root: &Path) -> Option<(ExtConfigType, PathBuf)> {
    debug!(app_root = %app_root.display(), "searching for external config");
    for (kind, name) in defaults::ext_config_file_names() {
        let path = app_root.join(name);
        if path.is_file() {
            info!(path = %path.display(), kind = %kind, "found external config");
            return Some((kind, path));
        }
    }

    debug!("no external config found");
    None
}

/// Load an external config file, dispatching on its extension
pub fn load_ext_config(
    path: &Path,
    evaluator: &dyn ExtConfigEvaluator,
) -> Result<(ExtConfigType, ExternalConfig)> {
    let kind = ExtConfigType::from_path(path).ok_or_else(|| ConfigError::InvalidValue {
        field: "extConfigFilePath".to_string(),
        message: format!("{} is not a .json, .js or .ts file", path.display()),
    })?;
    info!(path = %path.display(), kind = %kind, "loading external config");

    let value = match kind {
        ExtConfigType::Json => {
            let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
                _ => ConfigError::Io(e),
            })?;
            serde_json::from_str(&content).map_err(ConfigError::JsonError)?
        }
        ExtConfigType::Js | ExtConfigType::Ts => evaluator.evaluate(path, kind)?,
    };

    Ok((kind, ExternalConfig::from_value(value)?))
}

/// Builds a [`Config`] for one CLI invocation
pub struct ConfigLoader {
    app_root: PathBuf,
    cli_root: Option<PathBuf>,
    cli_package: Option<PackageJson>,
    os: Os,
    evaluator: Box<dyn ExtConfigEvaluator>,
    tool_locator: Arc<dyn ToolLocator>,
}

impl ConfigLoader {
    /// Loader for the app rooted at `app_root`, running on the current host
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
            cli_root: None,
            cli_package: None,
            os: Os::current(),
            evaluator: Box::new(NoScriptEvaluator),
            tool_locator: Arc::new(SystemToolLocator::new()),
        }
    }

    /// Where the CLI and its bundled assets are installed.
    /// Defaults to the directory of the running executable.
    pub fn cli_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cli_root = Some(root.into());
        self
    }

    /// Package metadata of the CLI, used when the CLI root has no package.json
    pub fn cli_package(mut self, package: PackageJson) -> Self {
        self.cli_package = Some(package);
        self
    }

    /// Override host detection
    pub fn os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }

    pub fn evaluator(mut self, evaluator: impl ExtConfigEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn tool_locator(mut self, locator: impl ToolLocator + 'static) -> Self {
        self.tool_locator = Arc::new(locator);
        self
    }

    /// Load and validate the configuration.
    ///
    /// Deferred fields are set up but not resolved; nothing here blocks on
    /// tool discovery.
    #[instrument(skip(self), fields(app_root = %self.app_root.display(), os = %self.os))]
    pub fn load(&self) -> Result<Config> {
        let config = self.load_unvalidated()?;
        validate_config(&config)?;
        debug!("config loaded and validated");
        Ok(config)
    }

    /// Load without validation
    pub fn load_unvalidated(&self) -> Result<Config> {
        let app_root = resolve_path(&std::env::current_dir()?, &self.app_root);

        let package = PackageJson::load(&app_root.join("package.json"))?;

        let (ext_config_type, ext_config_file_path, ext_config) =
            match find_ext_config(&app_root) {
                Some((_, path)) => {
                    let (kind, ext) = load_ext_config(&path, self.evaluator.as_ref())?;
                    (kind, path, ext)
                }
                None => {
                    warn!(app_root = %app_root.display(), "no external config found, using defaults");
                    let kind = ExtConfigType::Json;
                    let path = app_root.join(defaults::ext_config_file_name(kind));
                    (kind, path, ExternalConfig::default())
                }
            };
        let ext_config = Arc::new(ext_config);

        let app = self.app_config(
            &app_root,
            package,
            ext_config_type,
            ext_config_file_path,
            ext_config.clone(),
        );
        let web = PlatformConfig::new(&app_root, defaults::WEB_PLATFORM, app.web_dir.rel());

        Ok(Config {
            android: self.android_config(&app_root, &ext_config),
            ios: self.ios_config(&app_root, &ext_config),
            web,
            cli: self.cli_config(&app_root)?,
            plugins: ext_config.plugins.clone(),
            app,
        })
    }

    fn cli_config(&self, app_root: &Path) -> Result<CliConfig> {
        let root = match &self.cli_root {
            Some(root) => resolve_path(app_root, root),
            None => std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| app_root.to_path_buf()),
        };

        let manifest = root.join("package.json");
        let package = if manifest.is_file() {
            PackageJson::load(&manifest)?
        } else {
            self.cli_package
                .clone()
                .unwrap_or_else(|| PackageJson::new("tether", env!("CARGO_PKG_VERSION")))
        };

        debug!(cli_root = %root.display(), "resolved CLI root");
        Ok(CliConfig::new(root, package, self.os))
    }

    fn app_config(
        &self,
        app_root: &Path,
        package: PackageJson,
        ext_config_type: ExtConfigType,
        ext_config_file_path: PathBuf,
        ext_config: Arc<ExternalConfig>,
    ) -> AppConfig {
        let web_dir = ext_config
            .web_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_WEB_DIR));
        let ext_config_name = ext_config_file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        AppConfig {
            root_dir: app_root.to_path_buf(),
            app_id: ext_config.app_id.clone().unwrap_or_default(),
            app_name: ext_config
                .app_name
                .clone()
                .unwrap_or_else(|| package.name.clone()),
            web_dir: ProjectPath::new(app_root, web_dir),
            package,
            ext_config_type,
            ext_config_name,
            ext_config_file_path,
            ext_config,
        }
    }

    fn android_config(&self, app_root: &Path, ext: &Arc<ExternalConfig>) -> AndroidConfig {
        let section = ext.android.clone().unwrap_or_default();
        let platform = PlatformConfig::new(
            app_root,
            android::PLATFORM,
            section
                .path
                .unwrap_or_else(|| PathBuf::from(android::PLATFORM_DIR)),
        );
        let root = platform.platform_dir.abs().to_path_buf();

        let app_dir = ProjectPath::new(&root, android::APP_DIR);
        let src_dir = app_dir.child(android::SRC_DIR);
        let src_main_dir = src_dir.child(android::MAIN_DIR);
        let assets_dir = src_main_dir.child(android::ASSETS_DIR);
        let web_dir = assets_dir.child(android::WEB_DIR);
        let res_dir = src_main_dir.child(android::RES_DIR);
        let build_output_dir = app_dir
            .child(android::BUILD_OUTPUT_DIR)
            .child(android::DEFAULT_VARIANT);

        let os = self.os;
        let configured = env_path(defaults::ENV_ANDROID_STUDIO_PATH).or_else(|| {
            ext.android_studio_path(os)
                .map(|path| config_tool_path(app_root, path))
        });
        let locator = self.tool_locator.clone();
        let studio_path =
            Deferred::new(async move { locator.android_studio(os, configured).await });

        let mut config = AndroidConfig {
            cordova_plugins_dir: ProjectPath::new(&root, android::CORDOVA_PLUGINS_DIR),
            studio_path,
            min_version: section
                .min_version
                .unwrap_or_else(|| android::MIN_VERSION.to_string()),
            app_dir,
            src_dir,
            src_main_dir,
            web_dir,
            assets_dir,
            res_dir,
            build_output_dir,
            apk_name: String::new(),
            flavor: section.flavor.unwrap_or_default(),
            build_options: section.build_options,
            platform,
        };
        config.apk_name = config.flavor_apk_name(&config.flavor, android::DEFAULT_VARIANT);
        config
    }

    fn ios_config(&self, app_root: &Path, ext: &Arc<ExternalConfig>) -> IosConfig {
        let section = ext.ios.clone().unwrap_or_default();
        let platform = PlatformConfig::new(
            app_root,
            ios::PLATFORM,
            section.path.unwrap_or_else(|| PathBuf::from(ios::PLATFORM_DIR)),
        );
        let root = platform.platform_dir.abs().to_path_buf();

        let native_project_dir = ProjectPath::new(&root, ios::NATIVE_PROJECT_DIR);
        let native_target_dir = native_project_dir.child(ios::NATIVE_TARGET_DIR);
        let native_xcode_proj_dir = native_project_dir.child(ios::NATIVE_XCODE_PROJ_DIR);

        let configured = env_path(defaults::ENV_COCOAPODS_PATH).or_else(|| {
            ext.cocoapods_path
                .as_deref()
                .map(|path| config_tool_path(app_root, path))
        });
        let locator = self.tool_locator.clone();
        let pod_path = Deferred::new(async move { locator.cocoapods(configured).await });

        IosConfig {
            cordova_plugins_dir: ProjectPath::new(&root, ios::CORDOVA_PLUGINS_DIR),
            min_version: section
                .min_version
                .unwrap_or_else(|| ios::MIN_VERSION.to_string()),
            pod_path,
            scheme: section.scheme.unwrap_or_else(|| ios::SCHEME.to_string()),
            web_dir: Deferred::new(probe_ios_web_dir(native_target_dir.clone())),
            native_xcode_workspace_dir: Deferred::new(probe_xcode_workspace(
                native_project_dir.clone(),
            )),
            native_project_dir,
            native_target_dir,
            native_xcode_proj_dir,
            build_options: section.build_options,
            platform,
        }
    }
}

/// Tool location from the external config file. Paths are relative to the
/// app root; a bare command name is left for the `PATH` lookup.
fn config_tool_path(app_root: &Path, path: &Path) -> PathBuf {
    if path.components().count() > 1 || path.is_absolute() {
        resolve_path(app_root, path)
    } else {
        path.to_path_buf()
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::{AndroidReleaseType, XcodeExportMethod};
    use crate::deferred::Resolution;
    use crate::error::{ResolveError, TetherError};
    use serde_json::json;
    use tempfile::TempDir;

    struct FixedEvaluator(serde_json::Value);

    impl ExtConfigEvaluator for FixedEvaluator {
        fn evaluate(&self, _path: &Path, _kind: ExtConfigType) -> Result<serde_json::Value> {
            Ok(self.0.clone())
        }
    }

    struct MissingTools;

    #[async_trait::async_trait]
    impl ToolLocator for MissingTools {
        async fn android_studio(
            &self,
            _os: Os,
            _configured: Option<PathBuf>,
        ) -> std::result::Result<PathBuf, ResolveError> {
            Err(ResolveError::tool_not_found("Android Studio", "install it"))
        }

        async fn cocoapods(
            &self,
            configured: Option<PathBuf>,
        ) -> std::result::Result<PathBuf, ResolveError> {
            configured.ok_or_else(|| ResolveError::tool_not_found("pod", "install it"))
        }
    }

    fn project(config_file: Option<(&str, &str)>) -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"name": "my-app", "version": "1.2.3", "dependencies": {"vite": "^5.0.0"}}"#,
        )
        .unwrap();
        if let Some((name, content)) = config_file {
            std::fs::write(temp.path().join(name), content).unwrap();
        }
        temp
    }

    fn loader(temp: &TempDir) -> ConfigLoader {
        ConfigLoader::new(temp.path())
            .cli_root(temp.path().join("cli"))
            .os(Os::Linux)
            .tool_locator(MissingTools)
    }

    #[test]
    fn test_find_ext_config_prefers_ts() {
        let temp = project(Some(("tether.config.json", "{}")));
        std::fs::write(temp.path().join("tether.config.ts"), "export default {}").unwrap();

        let (kind, path) = find_ext_config(temp.path()).unwrap();
        assert_eq!(kind, ExtConfigType::Ts);
        assert_eq!(path, temp.path().join("tether.config.ts"));
    }

    #[test]
    fn test_load_json_round_trip() {
        let source = json!({
            "appId": "com.example.app",
            "appName": "Example",
            "webDir": "dist",
            "android": {"buildOptions": {"releaseType": "APK", "keystoreAlias": "upload"}},
            "ios": {"scheme": "Example", "buildOptions": {"exportMethod": "enterprise"}},
            "plugins": {"SplashScreen": {"launchShowDuration": 0}}
        });
        let temp = project(Some(("tether.config.json", &source.to_string())));

        let config = loader(&temp).load().unwrap();
        assert_eq!(config.app.ext_config_type, ExtConfigType::Json);
        assert_eq!(config.app.ext_config_name, "tether.config.json");
        assert_eq!(serde_json::to_value(config.app.ext_config.as_ref()).unwrap(), source);

        assert_eq!(config.app.app_id, "com.example.app");
        assert_eq!(config.app.web_dir.abs(), temp.path().join("dist"));
        assert_eq!(config.web.platform_dir, config.app.web_dir);
        assert_eq!(config.ios.scheme, "Example");
        assert_eq!(
            config.android.build_options.release_type,
            Some(AndroidReleaseType::Apk)
        );
        assert_eq!(
            config.ios.build_options.export_method,
            Some(XcodeExportMethod::Enterprise)
        );
        assert_eq!(config.plugin_names(), vec!["SplashScreen"]);
    }

    #[test]
    fn test_load_script_configs_through_evaluator() {
        for name in ["tether.config.ts", "tether.config.js"] {
            let temp = project(Some((name, "export default config;")));
            let source = json!({"appId": "com.example.scripted", "appName": "Scripted"});

            let config = loader(&temp)
                .evaluator(FixedEvaluator(source.clone()))
                .load()
                .unwrap();

            let expected = ExtConfigType::from_path(Path::new(name)).unwrap();
            assert_eq!(config.app.ext_config_type, expected);
            assert_eq!(config.app.ext_config_file_path, temp.path().join(name));
            assert_eq!(serde_json::to_value(config.app.ext_config.as_ref()).unwrap(), source);
        }
    }

    #[test]
    fn test_script_config_without_evaluator() {
        let temp = project(Some(("tether.config.ts", "export default {};")));
        let err = loader(&temp).load().unwrap_err();
        assert!(matches!(
            err,
            TetherError::Config(ConfigError::UnsupportedConfigType { .. })
        ));
    }

    #[test]
    fn test_malformed_json_config() {
        let temp = project(Some(("tether.config.json", "{ appId: ")));
        let err = loader(&temp).load().unwrap_err();
        assert!(matches!(err, TetherError::Config(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_missing_package_json() {
        let temp = TempDir::new().unwrap();
        let err = loader(&temp).load().unwrap_err();
        assert!(matches!(err, TetherError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp = project(None);
        let config = loader(&temp).load_unvalidated().unwrap();

        assert_eq!(config.app.app_name, "my-app");
        assert_eq!(config.app.app_id, "");
        assert_eq!(config.app.ext_config_type, ExtConfigType::Json);
        assert_eq!(config.app.web_dir.rel(), Path::new("www"));
        assert!(config.plugins.is_none());
        assert_eq!(config.cli.package.name, "tether");
        assert_eq!(config.cli.os, Os::Linux);

        // appId is required
        assert!(loader(&temp).load().is_err());
    }

    #[test]
    fn test_android_layout() {
        let temp = project(Some((
            "tether.config.json",
            r#"{"appId": "com.example.app", "android": {"path": "native/android", "flavor": "prod"}}"#,
        )));
        let config = loader(&temp).load().unwrap();
        let android = &config.android;
        let root = temp.path().join("native/android");

        assert_eq!(android.platform.platform_dir.abs(), root);
        assert_eq!(android.web_dir.rel(), Path::new("app/src/main/assets/public"));
        assert_eq!(android.res_dir.abs(), root.join("app/src/main/res"));
        assert_eq!(android.build_output_dir.rel(), Path::new("app/build/outputs/apk/debug"));
        assert_eq!(android.build_output_dir_abs(), root.join("app/build/outputs/apk/debug"));
        assert_eq!(android.apk_name, "app-prod-debug.apk");
        assert_eq!(android.flavor, "prod");
        assert_eq!(android.min_version, "23");
        assert_eq!(
            android.flavor_output_dir("prod", "release").rel(),
            Path::new("app/build/outputs/apk/prod/release")
        );
        assert_eq!(android.flavor_apk_name("prod", "release"), "app-prod-release.apk");
        assert_eq!(
            android.flavor_apk_name("prod", android::DEFAULT_VARIANT),
            android.apk_name
        );

        let unflavored = project(Some(("tether.config.json", r#"{"appId": "com.example.app"}"#)));
        let config = loader(&unflavored).load().unwrap();
        assert_eq!(config.android.apk_name, "app-debug.apk");
    }

    #[test]
    fn test_every_path_pair_consistent() {
        let temp = project(Some((
            "tether.config.json",
            r#"{"appId": "com.example.app", "webDir": "../shared/www", "ios": {"path": "./apple"}}"#,
        )));
        let config = loader(&temp).load().unwrap();

        for pair in config.path_pairs() {
            assert_eq!(
                pair.path.abs(),
                resolve_path(pair.root, pair.path.rel()),
                "{} is inconsistent",
                pair.field
            );
        }
        assert_eq!(
            config.app.web_dir.abs(),
            temp.path().parent().unwrap().join("shared/www")
        );
    }

    #[test]
    fn test_build_options_patched_after_load() {
        let temp = project(Some(("tether.config.json", r#"{"appId": "com.example.app"}"#)));
        let mut config = loader(&temp).load().unwrap();
        assert!(config.android.build_options.keystore_signing().is_none());

        config.android.build_options.keystore_path = Some(PathBuf::from("release.jks"));
        config.android.build_options.keystore_alias = Some("upload".to_string());

        fn signing_keystore(config: &Config) -> Option<PathBuf> {
            config
                .android
                .build_options
                .keystore_signing()
                .map(|s| s.path.to_path_buf())
        }
        assert_eq!(signing_keystore(&config), Some(PathBuf::from("release.jks")));
        // Nothing else moved
        assert!(config.ios.build_options.is_empty());
        assert_eq!(config.app.ext_config.android_build_options(), Default::default());
    }

    #[test]
    fn test_config_tool_paths_relative_to_app_root() {
        let app_root = Path::new("/work/app");
        assert_eq!(
            config_tool_path(app_root, Path::new("tools/pod")),
            PathBuf::from("/work/app/tools/pod")
        );
        assert_eq!(
            config_tool_path(app_root, Path::new("../sdk/studio.sh")),
            PathBuf::from("/work/sdk/studio.sh")
        );
        assert_eq!(
            config_tool_path(app_root, Path::new("/usr/local/bin/pod")),
            PathBuf::from("/usr/local/bin/pod")
        );
        // Bare names stay PATH lookups
        assert_eq!(config_tool_path(app_root, Path::new("pod")), PathBuf::from("pod"));
    }

    #[tokio::test]
    async fn test_relative_tool_paths_found_outside_cwd() {
        let temp = project(Some((
            "tether.config.json",
            r#"{
                "appId": "com.example.app",
                "cocoapodsPath": "tools/pod",
                "linux": {"androidStudioPath": "tools/android-studio/bin/studio.sh"}
            }"#,
        )));
        let studio = temp.path().join("tools/android-studio/bin/studio.sh");
        std::fs::create_dir_all(studio.parent().unwrap()).unwrap();
        std::fs::write(&studio, "").unwrap();
        std::fs::write(temp.path().join("tools/pod"), "").unwrap();

        // The process CWD is not the app root
        assert_ne!(std::env::current_dir().unwrap(), temp.path());
        let config = ConfigLoader::new(temp.path())
            .cli_root(temp.path().join("cli"))
            .os(Os::Linux)
            .load()
            .unwrap();

        if std::env::var_os(defaults::ENV_COCOAPODS_PATH).is_none() {
            assert_eq!(
                config.ios.pod_path.get().await.unwrap(),
                temp.path().join("tools/pod")
            );
        }
        if std::env::var_os(defaults::ENV_ANDROID_STUDIO_PATH).is_none() {
            assert_eq!(config.android.studio_path.get().await.unwrap(), studio);
        }
    }

    #[tokio::test]
    async fn test_deferred_fields_resolve_independently() {
        let temp = project(Some((
            "tether.config.json",
            r#"{"appId": "com.example.app", "cocoapodsPath": "/usr/local/bin/pod"}"#,
        )));
        std::fs::create_dir_all(temp.path().join("ios/App/App")).unwrap();
        let config = loader(&temp).load().unwrap();

        assert!(config.android.studio_path.state().is_pending());
        assert!(config.ios.pod_path.state().is_pending());

        let (studio, pod, web, workspace) = tokio::join!(
            config.android.studio_path.get(),
            config.ios.pod_path.get(),
            config.ios.web_dir.get(),
            config.ios.native_xcode_workspace_dir.get(),
        );

        assert!(matches!(studio, Err(ResolveError::ToolNotFound { .. })));
        assert!(matches!(config.android.studio_path.state(), Resolution::Failed(_)));
        assert_eq!(pod.unwrap(), PathBuf::from("/usr/local/bin/pod"));
        assert_eq!(web.unwrap().abs(), temp.path().join("ios/App/App/public"));
        assert_eq!(
            workspace.unwrap().abs(),
            temp.path().join("ios/App/App.xcworkspace")
        );
    }
}
