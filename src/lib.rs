// Salesync - SQL Server to PostgreSQL sales replication
// Copyright (c) 2025 Salesync Contributors
// Licensed under the MIT License

//! # Salesync - SQL Server to PostgreSQL sales replication
//!
//! Salesync copies a SQL Server sales table into a PostgreSQL replica so
//! analytics tooling can query the replica without touching production.
//!
//! ## Overview
//!
//! Every run is a full re-scan of the source:
//! - **Ensure** the target table exists (`CREATE TABLE IF NOT EXISTS`)
//! - **Extract** rows through one ordered streaming cursor
//! - **Load** them in a single transaction with `ON CONFLICT (fsno) DO NOTHING`
//!
//! Re-running is safe: rows already in the replica are skipped, never
//! updated, and a failed run commits nothing.
//!
//! ## Architecture
//!
//! Salesync follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The replication pipeline and its coordinator
//! - [`adapters`] - Store traits, SQL Server source, PostgreSQL target
//! - [`domain`] - Sales record, table names, error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salesync::config::resolve_config;
//! use salesync::core::pipeline::PipelineCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // salesync.toml if present, otherwise MSSQL_CONN / POSTGRES_CONN
//!     let config = resolve_config(None)?;
//!
//!     let mut coordinator = PipelineCoordinator::connect(&config).await?;
//!     let summary = coordinator.execute().await?;
//!
//!     println!("Processed {} rows", summary.rows_processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing Without Databases
//!
//! The pipeline runs against any [`SourceStore`](adapters::database::SourceStore)
//! and [`TargetStore`](adapters::database::TargetStore). The in-memory stores
//! behave like the real ones for ordering, conflicts and rollback:
//!
//! ```rust
//! use salesync::adapters::database::{MemorySource, MemoryTarget};
//! use salesync::core::pipeline::{run_pipeline, PipelineSettings};
//! use salesync::domain::{SalesRecord, TableName};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut source = MemorySource::from_records([SalesRecord::with_fsno("A1")]);
//! let mut target = MemoryTarget::new();
//! let settings = PipelineSettings {
//!     source_table: TableName::new("Sales").unwrap(),
//!     target_table: TableName::new("SalesDB").unwrap(),
//!     dry_run: false,
//! };
//!
//! let summary = run_pipeline(&mut source, &mut target, &settings).await.unwrap();
//! assert_eq!(summary.rows_inserted, 1);
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], whose error is
//! [`domain::SalesyncError`]. Pipeline failures carry the number of rows
//! processed before the failure:
//!
//! ```rust
//! use salesync::domain::PipelineError;
//!
//! let err = PipelineError::Commit {
//!     rows_processed: 42,
//!     message: "connection closed".to_string(),
//! };
//! assert_eq!(err.rows_processed(), Some(42));
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
