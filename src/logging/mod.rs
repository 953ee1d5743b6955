//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with span timings
//! - JSON-formatted local log files with rotation
//! - `RUST_LOG` style filters, defaulting to `salesync=<level>`
//!
//! # Example
//!
//! ```no_run
//! use salesync::logging::init_logging;
//! use salesync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(rows_processed = 42, "Run finished");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a fatal error with context
///
/// Pipeline errors raised inside the load also record how many rows had
/// been processed.
///
/// # Example
///
/// ```no_run
/// use salesync::log_error_with_context;
/// use salesync::domain::SalesyncError;
///
/// let error = SalesyncError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        match $error {
            $crate::domain::SalesyncError::Pipeline(pipeline_error) => tracing::error!(
                error = %pipeline_error,
                rows_processed = ?pipeline_error.rows_processed(),
                context = $context,
                "Fatal error"
            ),
            other => tracing::error!(
                error = %other,
                context = $context,
                "Fatal error"
            ),
        }
    };
}
