//! CLI entrypoint for callkit
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod app;
mod commands;
mod output;

use anyhow::{Context, Result, anyhow};
use app::App;
use callkit_infrastructure::{ConfigLoader, FileConfig};
use clap::{CommandFactory, Parser};
use commands::Cli;
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("Invalid configuration: {e}"))?
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;

    for issue in config.validate() {
        warn!("{}", issue.message);
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    if cli.show_config {
        show_config(&cli, &config);
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    info!("Starting callkit");

    let format = cli.output.or(config.output.format).unwrap_or_default();
    let app = App::new(&config, cli.cache_dir, format);
    let result = app.run(command).await;
    app.shutdown().await;
    result
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` takes precedence over `-v`. Diagnostics go to stderr so
/// stdout carries only command output.
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(path) = file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer),
        )
        .init();
    Ok(Some(guard))
}

fn show_config(cli: &Cli, config: &FileConfig) {
    for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
        println!("{line}");
    }
    if cli.no_config {
        println!("  (--no-config: all files ignored)");
    }

    println!();
    println!("Effective configuration:");
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => warn!("Could not render configuration: {e}"),
    }
}
