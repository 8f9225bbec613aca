//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{info, warn};

use tether_core::config::defaults::{ext_config_file_name, DEFAULT_EXT_CONFIG_TEMPLATE};
use tether_core::config::find_ext_config;
use tether_core::{ExtConfigType, ExternalConfig, PackageJson};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Create a tether.config.json for the current project
#[derive(Debug, Args)]
pub struct InitCommand {
    /// App identifier in reverse-domain form, e.g. com.example.app
    #[arg(long)]
    pub app_id: Option<String>,

    /// Display name of the app (defaults to the package.json name)
    #[arg(long)]
    pub app_name: Option<String>,

    /// Directory containing the built web assets
    #[arg(long)]
    pub web_dir: Option<String>,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let cwd = std::env::current_dir()?;
        let (config_path, config) = self.write_config(&cwd)?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "config_path": config_path.to_string_lossy(),
                    "config": config,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::success(&format!(
                        "Created {}",
                        output::path_style().apply_to(config_path.display())
                    ));
                    output::info("Run 'tether validate' to check the configuration");
                }
            }
        }

        Ok(())
    }

    /// Write the JSON config into `app_root`.
    ///
    /// `--force` only replaces an existing JSON config. A script config takes
    /// precedence over JSON when loading, so writing next to one would have
    /// no effect.
    fn write_config(&self, app_root: &Path) -> anyhow::Result<(PathBuf, ExternalConfig)> {
        if let Some((kind, existing)) = find_ext_config(app_root) {
            if kind != ExtConfigType::Json {
                anyhow::bail!(
                    "{} already configures this project and would take precedence over {}. \
                     Remove it first to switch to a JSON config.",
                    existing.display(),
                    ext_config_file_name(ExtConfigType::Json)
                );
            }
            if !self.force {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    existing.display()
                );
            }
            warn!(path = %existing.display(), "overwriting external config");
        }

        let config = self.ext_config(app_root)?;
        let config_path = app_root.join(ext_config_file_name(ExtConfigType::Json));
        let content = format!("{}\n", serde_json::to_string_pretty(&config)?);
        std::fs::write(&config_path, content)?;
        info!(path = %config_path.display(), "wrote external config");

        Ok((config_path, config))
    }

    /// The default template with the command-line values applied
    fn ext_config(&self, app_root: &Path) -> anyhow::Result<ExternalConfig> {
        let mut config = ExternalConfig::from_value(serde_json::from_str(DEFAULT_EXT_CONFIG_TEMPLATE)?)?;

        if let Some(app_id) = &self.app_id {
            config = config.with_app_id(app_id);
        }
        if let Some(web_dir) = &self.web_dir {
            config = config.with_web_dir(web_dir);
        }

        let package_name = PackageJson::load(&app_root.join("package.json"))
            .ok()
            .map(|package| package.name);
        if let Some(app_name) = self.app_name.clone().or(package_name) {
            config.app_name = Some(app_name);
        }

        Ok(config)
    }
}
