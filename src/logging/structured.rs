//! Structured logging setup using tracing
//!
//! Console output is always on. A JSON file layer with rotation is added
//! when `logging.local_enabled` is set.
//!
//! # Example
//!
//! ```no_run
//! use salesync::logging::init_logging;
//! use salesync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{Result, SalesyncError};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// File name prefix for the JSON log
const LOG_FILE_NAME: &str = "salesync.log";

/// Guard that must be kept alive for the duration of the program
/// so buffered file logs are flushed on exit
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }

    /// Whether a file layer is active
    pub fn has_file_output(&self) -> bool {
        self._file_guard.is_some()
    }
}

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `log_level_str` when set.
///
/// # Arguments
///
/// * `log_level_str` - Log level as a string (trace, debug, info, warn, error)
/// * `config` - Logging configuration
///
/// # Errors
///
/// Returns a configuration error if the level is unknown, the log directory
/// cannot be created, or a global subscriber is already installed.
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let env_filter = build_filter(log_level_str)?;

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter.clone());
    layers.push(console_layer.boxed());

    let file_guard = if config.local_enabled {
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            SalesyncError::Configuration(format!(
                "Failed to create log directory {}: {}",
                config.local_path, e
            ))
        })?;

        let file_appender = RollingFileAppender::new(
            rotation_for(&config.local_rotation),
            &config.local_path,
            LOG_FILE_NAME,
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(non_blocking)
            .with_filter(env_filter);

        layers.push(file_layer.boxed());
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| SalesyncError::Configuration(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        local_rotation = %config.local_rotation,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard))
}

/// Builds the filter from `RUST_LOG`, falling back to `salesync=<level>`
fn build_filter(log_level_str: &str) -> Result<EnvFilter> {
    let log_level = parse_log_level(log_level_str)?;
    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("salesync={}", log_level))))
}

fn rotation_for(rotation: &str) -> Rotation {
    match rotation {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(SalesyncError::Configuration(format!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("trace", Level::TRACE)]
    #[test_case("DEBUG", Level::DEBUG)]
    #[test_case("Info", Level::INFO)]
    #[test_case("warn", Level::WARN)]
    #[test_case("error", Level::ERROR)]
    fn test_parse_log_level(input: &str, expected: Level) {
        assert_eq!(parse_log_level(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_level_invalid() {
        assert!(parse_log_level("verbose").is_err());
        assert!(parse_log_level("").is_err());
    }

    #[test]
    fn test_rotation_for() {
        assert_eq!(rotation_for("hourly"), Rotation::HOURLY);
        assert_eq!(rotation_for("never"), Rotation::NEVER);
        assert_eq!(rotation_for("daily"), Rotation::DAILY);
    }

    #[test]
    fn test_build_filter_rejects_unknown_level() {
        assert!(build_filter("loud").is_err());
    }

    #[test]
    fn test_logging_guard_without_file() {
        let guard = LoggingGuard::new(None);
        assert!(!guard.has_file_output());
    }
}
