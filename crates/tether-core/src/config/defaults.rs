//! Default configuration values

use super::external::ExtConfigType;

/// Base name of the external config file
pub const EXT_CONFIG_BASE_NAME: &str = "tether.config";

/// Config file flavours in search order
pub const EXT_CONFIG_SEARCH_ORDER: [ExtConfigType; 3] =
    [ExtConfigType::Ts, ExtConfigType::Js, ExtConfigType::Json];

/// Get list of config file names to search for
pub fn ext_config_file_names() -> Vec<(ExtConfigType, String)> {
    EXT_CONFIG_SEARCH_ORDER
        .iter()
        .map(|kind| (*kind, ext_config_file_name(*kind)))
        .collect()
}

/// File name of a config of the given flavour
pub fn ext_config_file_name(kind: ExtConfigType) -> String {
    format!("{}.{}", EXT_CONFIG_BASE_NAME, kind.extension())
}

/// Web asset directory when none is configured
pub const DEFAULT_WEB_DIR: &str = "www";

/// Platform name of the web target
pub const WEB_PLATFORM: &str = "web";

/// Environment variable overriding the Android Studio location
pub const ENV_ANDROID_STUDIO_PATH: &str = "TETHER_ANDROID_STUDIO_PATH";

/// Environment variable overriding the CocoaPods executable
pub const ENV_COCOAPODS_PATH: &str = "TETHER_COCOAPODS_PATH";

/// Android project layout, relative to the Android platform directory unless
/// noted otherwise
pub mod android {
    pub const PLATFORM: &str = "android";
    /// Relative to the app root
    pub const PLATFORM_DIR: &str = "android";
    pub const CORDOVA_PLUGINS_DIR: &str = "capacitor-cordova-android-plugins";
    pub const APP_DIR: &str = "app";
    pub const SRC_DIR: &str = "src";
    pub const MAIN_DIR: &str = "main";
    pub const ASSETS_DIR: &str = "assets";
    pub const WEB_DIR: &str = "public";
    pub const RES_DIR: &str = "res";
    pub const BUILD_OUTPUT_DIR: &str = "build/outputs/apk";
    pub const DEFAULT_VARIANT: &str = "debug";
    pub const MIN_VERSION: &str = "23";
}

/// iOS project layout, relative to the iOS platform directory unless noted
/// otherwise
pub mod ios {
    pub const PLATFORM: &str = "ios";
    /// Relative to the app root
    pub const PLATFORM_DIR: &str = "ios";
    pub const CORDOVA_PLUGINS_DIR: &str = "capacitor-cordova-ios-plugins";
    pub const NATIVE_PROJECT_DIR: &str = "App";
    /// Relative to the native project directory
    pub const NATIVE_TARGET_DIR: &str = "App";
    /// Relative to the native project directory
    pub const NATIVE_XCODE_PROJ_DIR: &str = "App.xcodeproj";
    /// Relative to the native project directory
    pub const NATIVE_XCODE_WORKSPACE_DIR: &str = "App.xcworkspace";
    /// Relative to the native target directory
    pub const WEB_DIR: &str = "public";
    pub const SCHEME: &str = "App";
    pub const MIN_VERSION: &str = "14.0";
    pub const POD_EXECUTABLE: &str = "pod";
}

/// Template archives bundled with the CLI, relative to the CLI root
pub mod assets {
    pub const ASSETS_DIR: &str = "assets";
    pub const ANDROID_TEMPLATE: &str = "android-template.tar.gz";
    pub const ANDROID_CORDOVA_PLUGINS_TEMPLATE: &str = "capacitor-cordova-android-plugins.tar.gz";
    pub const IOS_TEMPLATE: &str = "ios-pods-template.tar.gz";
    pub const IOS_CORDOVA_PLUGINS_TEMPLATE: &str = "capacitor-cordova-ios-plugins.tar.gz";
}

/// Default configuration template written for new projects
pub const DEFAULT_EXT_CONFIG_TEMPLATE: &str = r#"{
  "appId": "com.example.app",
  "appName": "My App",
  "webDir": "www"
}
"#;
