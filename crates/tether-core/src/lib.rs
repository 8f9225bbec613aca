//! Tether Core - configuration model for the Tether mobile build CLI
//!
//! A [`Config`] describes one web project together with its native Android
//! and iOS projects, the CLI installation and the host it runs on. It is
//! assembled once per invocation by [`ConfigLoader`] and is read-only
//! afterwards, except for the per-platform build option bags.
//!
//! Values that need filesystem probing or tool discovery (Android Studio,
//! CocoaPods, the iOS web and workspace directories) are [`Deferred`] and
//! resolved only when awaited.

pub mod config;
pub mod deferred;
pub mod error;
pub mod os;
pub mod tools;

pub use config::{
    AndroidBuildOptions, AndroidConfig, AppConfig, AsPlatform, CliConfig, Config, ConfigLoader,
    ExtConfigType, ExternalConfig, IosBuildOptions, IosConfig, PackageJson, PlatformConfig,
    PluginsConfig, ProjectPath, WebConfig,
};
pub use deferred::{Deferred, Resolution};
pub use error::{ConfigError, ResolveError, Result, TetherError};
pub use os::Os;
pub use tools::{SystemToolLocator, ToolLocator};
