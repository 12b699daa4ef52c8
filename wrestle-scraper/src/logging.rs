use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Scrape logs are kept for a week; a full run can take several hours.
const LOG_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 7);
const LOG_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Keeps the non-blocking file writer alive until dropped.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

/// Console + daily rolling file logging. `RUST_LOG` overrides `level`.
pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();

    let builder = EnvFilter::builder().with_default_directive(parse_level(level).into());
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log appender in {:?}", log_dir))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    spawn_log_cleanup(log_dir, prefix.to_string());

    Ok(LoggerGuard(guard))
}

fn spawn_log_cleanup(log_dir: PathBuf, prefix: String) {
    tokio::spawn(async move {
        loop {
            match remove_stale_logs(&log_dir, &prefix, LOG_MAX_AGE) {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Removed {} stale log files", removed),
                Err(e) => tracing::warn!("Failed to clean up old logs in {:?}: {}", log_dir, e),
            }
            tokio::time::sleep(LOG_CLEANUP_INTERVAL).await;
        }
    });
}

fn remove_stale_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.starts_with(prefix) || !file_name.ends_with(".log") {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
