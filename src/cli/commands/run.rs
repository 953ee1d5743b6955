//! Run command implementation
//!
//! This module implements the `run` command, which replicates the source
//! table into the target table.

use crate::cli::{exit_code, EXIT_CONFIGURATION, EXIT_SUCCESS};
use crate::config::SalesyncConfig;
use crate::core::pipeline::{PipelineCoordinator, RunSummary};
use crate::domain::TableName;
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Load inside a transaction, then roll back
    #[arg(long)]
    pub dry_run: bool,

    /// Override the source table
    #[arg(long)]
    pub source_table: Option<String>,

    /// Override the target table
    #[arg(long)]
    pub target_table: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Apply CLI overrides to the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an overriding table name is not a valid
    /// identifier.
    pub fn apply_overrides(&self, config: &mut SalesyncConfig) -> Result<(), String> {
        if let Some(table) = &self.source_table {
            tracing::info!(source_table = %table, "Overriding source table from CLI");
            config.pipeline.source_table = TableName::new(table.as_str())?;
        }

        if let Some(table) = &self.target_table {
            tracing::info!(target_table = %table, "Overriding target table from CLI");
            config.pipeline.target_table = TableName::new(table.as_str())?;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        Ok(())
    }

    /// Execute the run command
    pub async fn execute(&self, mut config: SalesyncConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Invalid table override");
            eprintln!("Invalid table override: {e}");
            return Ok(EXIT_CONFIGURATION);
        }

        if config.application.dry_run && !self.json {
            println!("🔍 DRY RUN MODE - the load will be rolled back");
            println!();
        }

        let mut coordinator = match PipelineCoordinator::connect(&config).await {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to connect");
                eprintln!("Failed to connect: {e}");
                return Ok(exit_code(&e));
            }
        };

        if !self.json {
            println!(
                "🚀 Replicating {} → {}",
                coordinator.settings().source_table,
                coordinator.settings().target_table
            );
        }

        match coordinator.execute().await {
            Ok(summary) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    print_summary(&summary);
                }
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                log_error_with_context!(&e, "Pipeline run failed");
                eprintln!("❌ Run failed: {e}");
                Ok(exit_code(&e))
            }
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("✅ Run completed");
    println!("  Run ID: {}", summary.run_id);
    println!("  Rows processed: {}", summary.rows_processed);
    println!("  Rows inserted: {}", summary.rows_inserted);
    println!("  Already present: {}", summary.conflicts_skipped);
    if summary.rows_skipped > 0 {
        println!("  ⚠️  Undecodable rows skipped: {}", summary.rows_skipped);
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if summary.dry_run {
        println!("  Dry run: nothing was committed");
    }
}
