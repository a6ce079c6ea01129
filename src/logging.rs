//! Tracing setup for the `wren` binary.
//!
//! `start` runs for days behind a process supervisor, so it keeps a JSON
//! trail under `~/.wren/logs/` next to the human-readable stderr stream.
//! The one-shot subcommands print their answer on stdout and stay quiet on
//! stderr unless `RUST_LOG` asks for more.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Prefix of the daily log files (`wren.log.YYYY-MM-DD`).
const LOG_FILE_PREFIX: &str = "wren.log";

/// Keeps the background log writer alive; hold it until `start` returns.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// `RUST_LOG` when set and valid, else `default`.
fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Logging for `wren start`: routing decisions and provider failures go to
/// a daily JSON file in `logs_dir` and to stderr (default level `info`).
///
/// # Errors
///
/// Returns an error if `logs_dir` cannot be created.
pub fn init_production(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create logs directory {}", logs_dir.display()))?;

    let daily = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(daily);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(file_writer);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_or("info"))
        .with(json_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard { _guard: guard })
}

/// Logging for `ask` and `classify`: stderr only, `warn` by default so a
/// missing API key is visible but routing chatter is not.
pub fn init_cli() {
    tracing_subscriber::fmt()
        .with_env_filter(filter_or("warn"))
        .with_writer(std::io::stderr)
        .init();
}
