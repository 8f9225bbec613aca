//! Tether - configuration CLI for web apps shipped as native mobile apps

mod cli;
mod exit_codes;

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;

/// Overrides the log directory
const LOG_DIR_ENV: &str = "TETHER_LOG_DIR";

/// Our crates at debug, everything else at warn
const FILE_LOG_FILTER: &str = "warn,tether=debug,tether_core=debug,tether_frameworks=debug";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli);

    cli.execute()
}

/// Console logs go to stderr so JSON output on stdout stays parseable.
/// The daily JSON log file is skipped when no log directory can be created.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level(cli.verbose, cli.quiet)));

    let (file_layer, guard) = match log_directory() {
        Some(log_dir) => {
            let appender = tracing_appender::rolling::daily(&log_dir, "tether.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_filter(EnvFilter::new(FILE_LOG_FILTER));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();

    guard
}

/// Console level when RUST_LOG is unset
fn console_level(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "warn",
    }
}

/// `$TETHER_LOG_DIR`, or `~/.tether/logs`; created if needed
fn log_directory() -> Option<PathBuf> {
    let log_dir = match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()?.join(".tether").join("logs"),
    };
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}
