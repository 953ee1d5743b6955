//! Domain models and types for Salesync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The unit of transfer** ([`SalesRecord`]) and its fixed column layout
//! - **Validated identifiers** ([`TableName`])
//! - **Error types** ([`SalesyncError`], [`PipelineError`], [`RowDecodeError`], [`StoreError`])
//! - **Result type aliases** ([`Result`], [`StoreResult`])
//!
//! # Null Handling
//!
//! Every [`SalesRecord`] field is an `Option`, so a SQL NULL read from the
//! source is bound as NULL in the target:
//!
//! ```rust
//! use salesync::domain::SalesRecord;
//!
//! let record = SalesRecord::with_fsno("A2");
//! assert!(record.net_pay.is_none());
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{
    ColumnDecodeError, PipelineError, RowDecodeError, SalesyncError, StoreError,
};
pub use ids::TableName;
pub use record::{SalesRecord, COLUMN_COUNT, IDENTITY_COLUMN, SOURCE_COLUMNS, TARGET_COLUMNS};
pub use result::{Result, StoreResult};
