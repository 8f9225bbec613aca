//! Config command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use tether_core::config::{
    AndroidReleaseType, AndroidSigningType, XcodeExportMethod, XcodeSigningStyle,
};
use tether_core::{AndroidBuildOptions, AsPlatform, Config, IosBuildOptions};

use super::resolve::{block_on, resolve_deferred, ResolvedField};
use crate::cli::output::{header, key_value, path, resolution};
use crate::cli::{Cli, OutputFormat};

/// Show the resolved project configuration
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(flatten)]
    pub android: AndroidBuildArgs,

    #[command(flatten)]
    pub ios: IosBuildArgs,

    /// Skip locating tools and probing native project directories
    #[arg(long)]
    pub no_resolve: bool,
}

/// Android build option overrides
#[derive(Debug, Args)]
#[command(next_help_heading = "Android build options")]
pub struct AndroidBuildArgs {
    /// Keystore used to sign release builds
    #[arg(long)]
    pub keystore_path: Option<PathBuf>,

    /// Keystore password
    #[arg(long, env = "TETHER_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub keystore_password: Option<String>,

    /// Key alias in the keystore
    #[arg(long)]
    pub keystore_alias: Option<String>,

    /// Key alias password
    #[arg(long, env = "TETHER_KEYSTORE_ALIAS_PASSWORD", hide_env_values = true)]
    pub keystore_alias_password: Option<String>,

    /// Release artifact type (AAB or APK)
    #[arg(long)]
    pub android_release_type: Option<AndroidReleaseType>,

    /// Signing tool (apksigner or jarsigner)
    #[arg(long)]
    pub signing_type: Option<AndroidSigningType>,
}

impl AndroidBuildArgs {
    pub fn to_options(&self) -> AndroidBuildOptions {
        AndroidBuildOptions {
            keystore_path: self.keystore_path.clone(),
            keystore_password: self.keystore_password.clone(),
            keystore_alias: self.keystore_alias.clone(),
            keystore_alias_password: self.keystore_alias_password.clone(),
            release_type: self.android_release_type,
            signing_type: self.signing_type,
        }
    }
}

/// iOS build option overrides
#[derive(Debug, Args)]
#[command(next_help_heading = "iOS build options")]
pub struct IosBuildArgs {
    /// Apple developer team ID
    #[arg(long)]
    pub team_id: Option<String>,

    /// Archive export method
    #[arg(long)]
    pub export_method: Option<XcodeExportMethod>,

    /// Code signing style (automatic or manual)
    #[arg(long)]
    pub xcode_signing_style: Option<XcodeSigningStyle>,

    /// Signing certificate name or SHA-1
    #[arg(long)]
    pub signing_certificate: Option<String>,

    /// Provisioning profile name or UUID
    #[arg(long)]
    pub provisioning_profile: Option<String>,
}

impl IosBuildArgs {
    pub fn to_options(&self) -> IosBuildOptions {
        IosBuildOptions {
            team_id: self.team_id.clone(),
            export_method: self.export_method,
            xcode_signing_style: self.xcode_signing_style,
            signing_certificate: self.signing_certificate.clone(),
            provisioning_profile: self.provisioning_profile.clone(),
        }
    }
}

impl ConfigCommand {
    /// Execute the config command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(no_resolve = self.no_resolve, "executing config command");
        let mut config = cli.loader()?.load()?;
        self.apply_build_options(&mut config);

        let resolved = if self.no_resolve {
            Vec::new()
        } else {
            block_on(resolve_deferred(&config))?
        };

        match cli.format {
            OutputFormat::Json => {
                let mut output = serde_json::to_value(config.redacted())?;
                if let Some(map) = output.as_object_mut() {
                    map.insert("resolved".to_string(), serde_json::to_value(&resolved)?);
                }
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    print_config(&config, &resolved);
                }
            }
        }

        Ok(())
    }

    /// Overlay the build option flags onto the loaded config
    fn apply_build_options(&self, config: &mut Config) {
        config
            .android
            .build_options
            .merge(&self.android.to_options());
        config.ios.build_options.merge(&self.ios.to_options());
    }
}

fn print_config(config: &Config, resolved: &[ResolvedField]) {
    println!("{}", header("App"));
    println!("{}", key_value("id", &config.app.app_id));
    println!("{}", key_value("name", &config.app.app_name));
    println!("{}", key_value("root", &path(&config.app.root_dir)));
    println!(
        "{}",
        key_value(
            "config",
            &format!(
                "{} ({})",
                path(&config.app.ext_config_file_path),
                config.app.ext_config_type
            )
        )
    );
    println!("{}", key_value("web dir", &path(config.web.platform_dir().abs())));
    println!();

    println!("{}", header("Android"));
    println!("{}", key_value("platform dir", &path(config.android.platform_dir().abs())));
    println!("{}", key_value("min SDK", &config.android.min_version));
    if !config.android.flavor.is_empty() {
        println!("{}", key_value("flavor", &config.android.flavor));
    }
    let options = &config.android.build_options;
    println!(
        "{}",
        key_value("release type", options.release_type_or_default().as_str())
    );
    if let Some(signing) = options.keystore_signing() {
        println!(
            "{}",
            key_value(
                "signing",
                &format!("{} ({}, {})", path(signing.path), signing.alias, signing.signing_type)
            )
        );
    }
    println!();

    println!("{}", header("iOS"));
    println!("{}", key_value("platform dir", &path(config.ios.platform_dir().abs())));
    println!("{}", key_value("scheme", &config.ios.scheme));
    println!("{}", key_value("deployment target", &config.ios.min_version));
    let options = &config.ios.build_options;
    println!(
        "{}",
        key_value("export method", options.export_method_or_default().as_str())
    );
    if let Some(team_id) = &options.team_id {
        println!("{}", key_value("team", team_id));
    }
    println!();

    let plugins = config.plugin_names();
    if !plugins.is_empty() {
        println!("{}", header("Plugins"));
        for name in plugins {
            println!("  {}", name);
        }
        println!();
    }

    if !resolved.is_empty() {
        println!("{}", header("Resolved"));
        for field in resolved {
            let value = resolution(field.value.as_deref(), field.error.as_deref());
            println!("{}", key_value(field.name, &value));
        }
    }
}
