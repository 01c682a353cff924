//! Logging setup for dataprepper
//!
//! Console output is always on. With `logging.log_to_file` enabled two
//! daily-rotating files are written as well:
//!
//! - `dataprepper.<date>.log`: everything that passes the filter
//! - `error.<date>.log`: warnings and errors only
//!
//! ```no_run
//! use dataprepper::config::LoggingConfig;
//!
//! dataprepper::logging::init(&LoggingConfig::default()).expect("logging");
//! tracing::info!("service started");
//! ```

use crate::config::LoggingConfig;
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Gets the log directory, creating it if needed.
///
/// Uses `config.log_dir` when set, otherwise the platform data directory
/// (`~/.local/share/dataprepper/logs` on Linux).
pub fn get_log_dir(config: &LoggingConfig) -> Result<PathBuf> {
    let log_dir = match &config.log_dir {
        Some(dir) => dir.clone(),
        None => dirs::data_dir()
            .context("Failed to determine data directory")?
            .join("dataprepper")
            .join("logs"),
    };

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

fn env_filter(default_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Failed to create env filter")
}

/// Initializes the global tracing subscriber.
///
/// # Errors
///
/// Returns error if the filter directive is invalid, the log directory cannot
/// be created, or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // stderr keeps stdout free for command output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    if !config.log_to_file {
        tracing_subscriber::registry()
            .with(env_filter(&config.level)?)
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
        return Ok(());
    }

    let log_dir = get_log_dir(config)?;

    let all_logs_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("dataprepper")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create all-logs file appender")?;

    let error_logs_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("error")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create error-logs file appender")?;

    let all_logs_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(all_logs_appender);

    let error_logs_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(error_logs_appender)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter(&config.level)?)
        .with(console_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized, log directory: {}", log_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_log_dir_is_created() -> Result<()> {
        let temp = tempfile::TempDir::new()?;
        let config = LoggingConfig {
            log_dir: Some(temp.path().join("logs")),
            ..Default::default()
        };
        let dir = get_log_dir(&config)?;
        assert!(dir.exists());
        assert!(dir.ends_with("logs"));
        Ok(())
    }

    #[test]
    fn test_env_filter_accepts_level() {
        assert!(env_filter("debug").is_ok());
    }
}
