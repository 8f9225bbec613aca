//! The user-authored project configuration

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::options::{AndroidBuildOptions, IosBuildOptions};
use crate::error::ConfigError;
use crate::os::Os;

/// Plugin name to plugin-specific configuration
pub type PluginsConfig = BTreeMap<String, serde_json::Value>;

/// Syntax of the external config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtConfigType {
    Json,
    Js,
    Ts,
}

impl ExtConfigType {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Js => "js",
            Self::Ts => "ts",
        }
    }

    /// Config type implied by a file's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl fmt::Display for ExtConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExtConfigType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "js" | "mjs" | "cjs" => Ok(Self::Js),
            "ts" | "mts" | "cts" => Ok(Self::Ts),
            other => Err(ConfigError::InvalidValue {
                field: "extConfigType".to_string(),
                message: format!("unsupported config file type '{}'", other),
            }),
        }
    }
}

/// Android section of the external config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AndroidExtConfig {
    /// Android platform directory, relative to the app root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Build flavor to use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Minimum supported SDK level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    #[serde(skip_serializing_if = "AndroidBuildOptions::is_empty")]
    pub build_options: AndroidBuildOptions,
}

/// iOS section of the external config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IosExtConfig {
    /// iOS platform directory, relative to the app root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Xcode scheme to build
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Minimum deployment target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    #[serde(skip_serializing_if = "IosBuildOptions::is_empty")]
    pub build_options: IosBuildOptions,
}

/// Windows host settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_studio_path: Option<PathBuf>,
}

/// Linux host settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinuxConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_studio_path: Option<PathBuf>,
}

/// Parsed external config.
///
/// [`AppConfig`](super::AppConfig) holds this behind an `Arc` and only hands
/// out shared references; overrides go through the `with_*` methods, which
/// return a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidExtConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<IosExtConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<WindowsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linux: Option<LinuxConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cocoapods_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginsConfig>,

    /// Keys this CLI does not interpret
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl ExternalConfig {
    /// Convert a parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::ParseError(
                "config root must be an object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn with_app_id(&self, app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            ..self.clone()
        }
    }

    pub fn with_web_dir(&self, web_dir: impl Into<PathBuf>) -> Self {
        Self {
            web_dir: Some(web_dir.into()),
            ..self.clone()
        }
    }

    pub fn with_plugin(&self, name: impl Into<String>, config: serde_json::Value) -> Self {
        let mut plugins = self.plugins.clone().unwrap_or_default();
        plugins.insert(name.into(), config);
        Self {
            plugins: Some(plugins),
            ..self.clone()
        }
    }

    /// Copy with keystore passwords masked. Serialization itself keeps them
    /// so the file content round-trips; only printed output is redacted.
    pub fn redacted(&self) -> Self {
        let mut redacted = self.clone();
        if let Some(android) = redacted.android.as_mut() {
            android.build_options = android.build_options.redacted();
        }
        redacted
    }

    /// Android build options declared in the file
    pub fn android_build_options(&self) -> AndroidBuildOptions {
        self.android
            .as_ref()
            .map(|a| a.build_options.clone())
            .unwrap_or_default()
    }

    /// iOS build options declared in the file
    pub fn ios_build_options(&self) -> IosBuildOptions {
        self.ios
            .as_ref()
            .map(|i| i.build_options.clone())
            .unwrap_or_default()
    }

    /// Android Studio location configured for the given host
    pub fn android_studio_path(&self, os: Os) -> Option<&Path> {
        match os {
            Os::Windows => self.windows.as_ref()?.android_studio_path.as_deref(),
            Os::Linux => self.linux.as_ref()?.android_studio_path.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::XcodeExportMethod;
    use serde_json::json;

    #[test]
    fn test_config_type_from_path() {
        assert_eq!(
            ExtConfigType::from_path(Path::new("tether.config.json")),
            Some(ExtConfigType::Json)
        );
        assert_eq!(
            ExtConfigType::from_path(Path::new("tether.config.ts")),
            Some(ExtConfigType::Ts)
        );
        assert_eq!(
            ExtConfigType::from_path(Path::new("tether.config.mjs")),
            Some(ExtConfigType::Js)
        );
        assert_eq!(ExtConfigType::from_path(Path::new("tether.config.yaml")), None);
        assert_eq!(ExtConfigType::from_path(Path::new("tether")), None);
    }

    #[test]
    fn test_parse_full_config() {
        let config = ExternalConfig::from_value(json!({
            "appId": "com.example.app",
            "appName": "Example",
            "webDir": "dist",
            "android": {"flavor": "prod", "buildOptions": {"releaseType": "APK"}},
            "ios": {"scheme": "Example", "buildOptions": {"exportMethod": "release-testing"}},
            "linux": {"androidStudioPath": "/opt/android-studio/bin/studio.sh"},
            "plugins": {"SplashScreen": {"launchShowDuration": 0}},
            "server": {"androidScheme": "https"}
        }))
        .unwrap();

        assert_eq!(config.app_id.as_deref(), Some("com.example.app"));
        assert_eq!(config.web_dir, Some(PathBuf::from("dist")));
        assert_eq!(
            config.ios_build_options().export_method,
            Some(XcodeExportMethod::ReleaseTesting)
        );
        assert_eq!(
            config.android_studio_path(Os::Linux),
            Some(Path::new("/opt/android-studio/bin/studio.sh"))
        );
        assert_eq!(config.android_studio_path(Os::Windows), None);
        assert!(config.other.contains_key("server"));
        assert_eq!(
            config.plugins.as_ref().unwrap()["SplashScreen"],
            json!({"launchShowDuration": 0})
        );
    }

    #[test]
    fn test_serialization_reproduces_source() {
        let source = json!({
            "appId": "com.example.app",
            "android": {"flavor": "prod"},
            "ios": {"scheme": "Example"}
        });
        let config = ExternalConfig::from_value(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&config).unwrap(), source);

        let signed = json!({
            "android": {"buildOptions": {
                "keystorePath": "release.jks",
                "keystorePassword": "hunter2",
                "keystoreAliasPassword": "hunter3"
            }}
        });
        let config = ExternalConfig::from_value(signed.clone()).unwrap();
        assert_eq!(serde_json::to_value(&config).unwrap(), signed);

        let printed = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!printed.contains("hunter"));
        assert!(printed.contains("release.jks"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ExternalConfig::from_value(json!(["appId"])).is_err());
    }

    #[test]
    fn test_overrides_produce_new_value() {
        let original = ExternalConfig {
            app_id: Some("com.example.app".to_string()),
            ..Default::default()
        };
        let patched = original
            .with_web_dir("build")
            .with_plugin("Keyboard", json!({"resize": "body"}));

        assert_eq!(original.web_dir, None);
        assert!(original.plugins.is_none());
        assert_eq!(patched.web_dir, Some(PathBuf::from("build")));
        assert_eq!(patched.app_id, original.app_id);
        assert!(patched.plugins.unwrap().contains_key("Keyboard"));
    }
}
