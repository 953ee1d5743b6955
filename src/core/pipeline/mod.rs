//! Replication pipeline
//!
//! This module provides the three stages of a run and their orchestration:
//! - Target schema creation ([`schema`])
//! - Ordered extraction with per-row decode isolation ([`extract`])
//! - Idempotent transactional loading ([`load`])
//! - Run summary and coordination ([`summary`], [`coordinator`])

pub mod coordinator;
pub mod extract;
pub mod load;
pub mod schema;
pub mod summary;

pub use coordinator::{run_pipeline, PipelineCoordinator, PipelineSettings};
pub use extract::{select_sql, Extractor};
pub use load::{insert_sql, LoadOptions, LoadReport, Loader};
pub use schema::{create_table_sql, ensure_target_table};
pub use summary::RunSummary;
