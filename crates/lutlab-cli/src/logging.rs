//! Logging setup.
//!
//! Console logs go to stderr so command output on stdout stays clean.
//! The level comes from `LUTLAB_LOG` when set, else from `-v` repetitions:
//! none = warn, `-v` = info, `-vv` = debug, `-vvv` = trace. `--log FILE`
//! adds a plain-text copy written by a background thread. The returned
//! guard flushes that thread when dropped, so callers hold it until exit.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "LUTLAB_LOG";

fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level(verbosity)))
}

/// Installs the global subscriber.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(verbosity));

    let mut guard = None;
    let file = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(name)
                .build(dir)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            let (writer, worker) = tracing_appender::non_blocking(appender);
            guard = Some(worker);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(filter(verbosity)),
            )
        }
        None => None,
    };

    Registry::default()
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install logger")?;
    Ok(guard)
}
