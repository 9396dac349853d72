//! Logging setup: stderr plus a per-run log file.
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform cache directory for client logs.
///
/// - macOS: `~/Library/Caches/quest-combat/logs`
/// - Linux: `~/.cache/quest-combat/logs` (or `$XDG_CACHE_HOME/quest-combat/logs`)
/// - Windows: `%LOCALAPPDATA%\quest-combat\cache\logs`
/// - Fallback: `/tmp/quest-combat/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "quest-combat")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/quest-combat"))
        .join("logs")
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// Keep the returned guard alive for the whole run; dropping it flushes the
/// file writer.
pub fn setup_logging() -> Result<WorkerGuard> {
    let run_id = format!("run_{}", chrono::Utc::now().format("%Y%m%dT%H%M%S"));
    let run_dir = log_dir().join(&run_id);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create log directory {}", run_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&run_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(run = %run_id, "Log file: {}/client.log", run_dir.display());
    Ok(guard)
}
