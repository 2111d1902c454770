//! Logging setup.
//!
//! Installs a `tracing` subscriber writing to the console and, when a log
//! directory is configured, to a daily-rolling file.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::diagnostics::DEFAULT_SUPPRESSED_PATTERN;
use crate::InfoResult;
use serde::{Deserialize, Serialize};

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Console output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for the rolling log file; no file output when unset.
    #[serde(default)]
    pub directory: Option<String>,

    /// Log file name prefix.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Diagnostics containing any of these substrings are not logged.
    #[serde(default = "default_suppressed_patterns")]
    pub suppressed_patterns: Vec<String>,
}

fn default_filter() -> String {
    "info,infovault=debug,tower_http=debug".to_string()
}

fn default_file_name() -> String {
    "api.log".to_string()
}

fn default_suppressed_patterns() -> Vec<String> {
    vec![DEFAULT_SUPPRESSED_PATTERN.to_string()]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
            directory: None,
            file_name: default_file_name(),
            suppressed_patterns: default_suppressed_patterns(),
        }
    }
}

/// Guard that flushes the file writer when dropped.
#[cfg(feature = "telemetry")]
pub type LogGuard = tracing_appender::non_blocking::WorkerGuard;

/// Initialize logging with the given configuration.
///
/// The returned guard must be held for the lifetime of the process when a
/// log directory is configured; dropping it stops file output.
#[cfg(feature = "telemetry")]
pub fn init_logging(config: &LoggingConfig) -> InfoResult<Option<LogGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let (pretty, json) = match config.format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_target(true))),
    };

    let (file, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(file)
        .try_init()
        .map_err(|e| crate::InfoError::Internal(format!("Failed to install logger: {}", e)))?;

    tracing::info!(
        format = ?config.format,
        directory = ?config.directory,
        "Logging initialized"
    );

    Ok(guard)
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_logging(_config: &LoggingConfig) -> InfoResult<Option<()>> {
    Ok(None)
}
