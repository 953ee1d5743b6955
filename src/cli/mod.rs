//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Salesync using clap.

pub mod commands;

use crate::domain::SalesyncError;
use clap::{Parser, Subcommand};

/// Exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for configuration errors
pub const EXIT_CONFIGURATION: i32 = 2;

/// Exit code for connection errors
pub const EXIT_CONNECTION: i32 = 4;

/// Exit code for pipeline and other fatal errors
pub const EXIT_FATAL: i32 = 5;

/// Maps an error to the process exit code
pub fn exit_code(err: &SalesyncError) -> i32 {
    match err {
        SalesyncError::Configuration(_) => EXIT_CONFIGURATION,
        SalesyncError::Connection(_) => EXIT_CONNECTION,
        SalesyncError::Pipeline(_) | SalesyncError::Serialization(_) | SalesyncError::Io(_) => {
            EXIT_FATAL
        }
    }
}

/// Salesync - SQL Server to PostgreSQL sales replication
#[derive(Parser, Debug)]
#[command(name = "salesync")]
#[command(version, about, long_about = None)]
#[command(author = "Salesync Contributors")]
pub struct Cli {
    /// Path to configuration file (default: salesync.toml if present,
    /// otherwise MSSQL_CONN and POSTGRES_CONN)
    #[arg(short, long, env = "SALESYNC_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SALESYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replicate the source table into the target table
    Run(commands::run::RunArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
