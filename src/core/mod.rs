//! Core business logic for Salesync.
//!
//! This module contains the replication pipeline and its orchestration.
//!
//! # Modules
//!
//! - [`pipeline`] - Schema ensurer, extractor, loader, summary and coordinator
//!
//! # Run Workflow
//!
//! 1. **Ensure**: `CREATE TABLE IF NOT EXISTS` on the target
//! 2. **Extract**: Open one ordered cursor over the source table
//! 3. **Load**: Insert every row in one transaction, skipping known identities
//! 4. **Report**: Commit and return a [`RunSummary`](pipeline::RunSummary)
//!
//! # Example
//!
//! ```rust,no_run
//! use salesync::config::load_config;
//! use salesync::core::pipeline::PipelineCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("salesync.toml")?;
//!
//! let mut coordinator = PipelineCoordinator::connect(&config).await?;
//! let summary = coordinator.execute().await?;
//!
//! println!("Processed: {}", summary.rows_processed);
//! println!("Inserted: {}", summary.rows_inserted);
//! # Ok(())
//! # }
//! ```

pub mod pipeline;
