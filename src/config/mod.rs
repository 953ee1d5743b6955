//! Configuration management for Salesync.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Salesync reads its settings from, in order of precedence:
//! - `SALESYNC_<SECTION>_<KEY>` environment overrides
//! - A TOML file with `${VAR_NAME}` substitution
//! - `MSSQL_CONN` and `POSTGRES_CONN` when no file is present
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use salesync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("salesync.toml")?;
//!
//! println!("Source table: {}", config.pipeline.source_table);
//! println!("Target table: {}", config.pipeline.target_table);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`SqlServerConfig`] - Source connection
//! - [`PostgreSQLConfig`] - Target connection and TLS mode
//! - [`PipelineConfig`] - Source and target table names
//! - [`LoggingConfig`] - Optional JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! connection_string = "${MSSQL_CONN}"
//!
//! [target]
//! connection_string = "${POSTGRES_CONN}"
//! ssl_mode = "prefer"
//!
//! [pipeline]
//! source_table = "Sales"
//! target_table = "SalesDB"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, resolve_config, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, LoggingConfig, PipelineConfig, PostgreSQLConfig, SalesyncConfig,
    SqlServerConfig, SOURCE_CONN_ENV, TARGET_CONN_ENV,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
