// Salesync - SQL Server to PostgreSQL sales replication
// Copyright (c) 2025 Salesync Contributors
// Licensed under the MIT License

use clap::Parser;
use salesync::cli::{exit_code, Cli, Commands, EXIT_CONFIGURATION, EXIT_FATAL};
use salesync::config::{resolve_config, LoggingConfig, SalesyncConfig};
use salesync::domain::Result;
use salesync::log_error_with_context;
use salesync::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // A missing .env file is silently ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Resolved before logging so the [logging] section can take effect
    let loaded = resolve_config(cli.config.as_deref());

    let (log_level, logging_config) = match &loaded {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_CONFIGURATION);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Salesync - SQL Server to PostgreSQL sales replication"
    );

    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush the file log first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: Result<SalesyncConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref(), loaded).await,
        Commands::Run(args) => match loaded {
            Ok(config) => args.execute(config).await,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("{e}");
                Ok(exit_code(&e))
            }
        },
    }
}
