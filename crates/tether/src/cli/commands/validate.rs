//! Validate command

use clap::Args;
use console::style;
use tracing::{info, warn};

use tether_core::config::validation::validate_config;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Validate the project configuration
#[derive(Debug, Args)]
pub struct ValidateCommand {}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing validate command");

        let config = match cli.loader()?.load_unvalidated() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "configuration could not be loaded");
                report(cli, None, Some(&e.to_string()))?;
                std::process::exit(exit_codes::CONFIG_ERROR);
            }
        };

        let config_path = config.app.ext_config_file_path.display().to_string();
        let error = validate_config(&config).err().map(|e| e.to_string());
        report(cli, Some(&config_path), error.as_deref())?;

        if error.is_some() {
            std::process::exit(exit_codes::VALIDATION_ERROR);
        }

        Ok(())
    }
}

fn report(cli: &Cli, config_path: Option<&str>, error: Option<&str>) -> anyhow::Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": error.is_none(),
                "config_path": config_path,
                "errors": error.into_iter().collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => match error {
            Some(error) => output::error(error),
            None if !cli.quiet => {
                if let Some(path) = config_path {
                    println!("Config: {}", output::path_style().apply_to(path));
                }
                println!("{}", style("✓ Configuration is valid").green().bold());
            }
            None => {}
        },
    }
    Ok(())
}
