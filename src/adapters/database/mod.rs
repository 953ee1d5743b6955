//! Database abstraction layer
//!
//! This module provides the trait seam between the pipeline core and the
//! concrete SQL Server and PostgreSQL adapters.

pub mod memory;
pub mod traits;

pub use memory::{MemorySource, MemoryTarget};
pub use traits::{SourceRow, SourceRows, SourceStore, TargetStore, TargetTransaction};
