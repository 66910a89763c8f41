//! QuizLens - AI answer suggestions for quiz pages
//!
//! Main entry point for the analysis proxy, one-shot queries and the page
//! watcher.

mod cli;
mod cmd_ask;
mod cmd_serve;
mod cmd_watch;
mod console;
mod page_file;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use quizlens_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};

/// Get the ~/.quizlens directory path.
pub(crate) fn quizlens_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".quizlens"))
        .unwrap_or_else(|| PathBuf::from(".quizlens"))
}

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so that stdout only carries command output.
/// Log files are written to ~/.quizlens/logs/ with daily rotation.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = quizlens_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("quizlens")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes buffered lines on drop; keep it for the whole run.
    static GUARD: OnceLock<WorkerGuard> = OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the config file when it exists, apply environment overrides, and
/// validate.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    let source = path.exists().then_some(path);
    if source.is_none() {
        debug!("No config file at {}, using defaults", path.display());
    }
    let config = ConfigLoader::load_or_default(source)
        .with_context(|| format!("loading config from {}", path.display()))?;

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in warnings {
        warn!("config {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { host, port } => cmd_serve::run(config, host, port).await,
        Commands::Ask {
            question,
            answers,
            deep,
            proxy_url,
        } => cmd_ask::run(&config, question, answers, deep, proxy_url).await,
        Commands::Watch { page, proxy_url } => cmd_watch::run(config, page, proxy_url).await,
    }
}
