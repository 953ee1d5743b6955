//! Domain error types
//!
//! This module defines the error hierarchy for Salesync.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Salesync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SalesyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A store could not be reached or authenticated against
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pipeline errors (schema, extraction, load, commit)
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Fatal pipeline errors
///
/// Every variant aborts the run. Variants raised after the load transaction
/// has started carry the number of rows processed before the failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The target DDL could not be applied
    #[error("Failed to create target table {table}: {message}")]
    Schema { table: String, message: String },

    /// The source query could not be issued
    #[error("Failed to query source table {table}: {message}")]
    Extraction { table: String, message: String },

    /// The source cursor failed after it started streaming
    #[error("Error iterating over source rows after {rows_processed} rows: {message}")]
    Cursor { rows_processed: u64, message: String },

    /// The target transaction or insert statement could not be set up
    #[error("Failed to start target transaction: {0}")]
    Transaction(String),

    /// An insert hit a hard error (not a key conflict)
    #[error("Failed to insert row with fsno {fsno} after {rows_processed} rows: {message}")]
    Load {
        fsno: String,
        rows_processed: u64,
        message: String,
    },

    /// The transaction could not be committed
    #[error("Failed to commit transaction after {rows_processed} rows: {message}")]
    Commit { rows_processed: u64, message: String },
}

impl PipelineError {
    /// Rows handed to the insert statement before the failure, if the
    /// failure happened inside the load
    pub fn rows_processed(&self) -> Option<u64> {
        match self {
            PipelineError::Cursor { rows_processed, .. }
            | PipelineError::Load { rows_processed, .. }
            | PipelineError::Commit { rows_processed, .. } => Some(*rows_processed),
            PipelineError::Schema { .. }
            | PipelineError::Extraction { .. }
            | PipelineError::Transaction(_) => None,
        }
    }
}

/// A single source column could not be decoded into its record field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column '{column}': {message}")]
pub struct ColumnDecodeError {
    /// Source column name
    pub column: &'static str,

    /// Driver message
    pub message: String,
}

impl ColumnDecodeError {
    /// Creates a new column decode error
    pub fn new(column: &'static str, message: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
        }
    }
}

/// A source row that failed to decode
///
/// This is the only recoverable error: the extractor logs it, skips the row
/// and keeps reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode source row {position}: {source}")]
pub struct RowDecodeError {
    /// 1-based position of the row in the source cursor
    pub position: u64,

    /// The failing column
    #[source]
    pub source: ColumnDecodeError,
}

/// Error raised by a store adapter
///
/// Adapters map driver errors into this type so that driver error types
/// never cross the store traits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    /// Creates a store error from any displayable driver error
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.0
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SalesyncError {
    fn from(err: std::io::Error) -> Self {
        SalesyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SalesyncError {
    fn from(err: serde_json::Error) -> Self {
        SalesyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SalesyncError {
    fn from(err: toml::de::Error) -> Self {
        SalesyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
