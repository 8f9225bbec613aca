//! Configuration validation

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::external::ExtConfigType;
use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_app(config)?;
    validate_ext_config_type(config)?;
    validate_min_versions(config)?;
    validate_paths(config)?;
    debug!("configuration validation passed");
    Ok(())
}

static APP_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*(\.[a-zA-Z][a-zA-Z0-9_]*)+$").expect("valid regex")
});

static IOS_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+){0,2}$").expect("valid regex"));

fn validate_app(config: &Config) -> Result<()> {
    if config.app.app_id.is_empty() {
        return Err(ConfigError::MissingField("appId".to_string()).into());
    }

    if !APP_ID_REGEX.is_match(&config.app.app_id) {
        return Err(ConfigError::InvalidValue {
            field: "appId".to_string(),
            message: format!(
                "'{}' must be in reverse-domain form, e.g. com.example.app",
                config.app.app_id
            ),
        }
        .into());
    }

    if config.app.app_name.trim().is_empty() {
        return Err(ConfigError::MissingField("appName".to_string()).into());
    }

    Ok(())
}

fn validate_ext_config_type(config: &Config) -> Result<()> {
    let declared = config.app.ext_config_type;
    let actual = ExtConfigType::from_path(&config.app.ext_config_file_path);
    if actual != Some(declared) {
        return Err(ConfigError::InvalidValue {
            field: "extConfigType".to_string(),
            message: format!(
                "declared '{}' but {} is not a {} file",
                declared,
                config.app.ext_config_file_path.display(),
                declared
            ),
        }
        .into());
    }
    Ok(())
}

fn validate_min_versions(config: &Config) -> Result<()> {
    if config.android.min_version.parse::<u32>().is_err() {
        return Err(ConfigError::InvalidValue {
            field: "android.minVersion".to_string(),
            message: format!(
                "'{}' must be an Android SDK level, e.g. 23",
                config.android.min_version
            ),
        }
        .into());
    }

    if !IOS_VERSION_REGEX.is_match(&config.ios.min_version) {
        return Err(ConfigError::InvalidValue {
            field: "ios.minVersion".to_string(),
            message: format!(
                "'{}' must be a deployment target, e.g. 14.0",
                config.ios.min_version
            ),
        }
        .into());
    }

    Ok(())
}

fn validate_paths(config: &Config) -> Result<()> {
    for pair in config.path_pairs() {
        if !pair.path.is_consistent_with(pair.root) {
            return Err(ConfigError::InvalidValue {
                field: pair.field.to_string(),
                message: format!(
                    "{} does not resolve {} against {}",
                    pair.path.abs().display(),
                    pair.path.rel().display(),
                    pair.root.display()
                ),
            }
            .into());
        }
    }
    Ok(())
}
