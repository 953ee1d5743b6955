//! Database abstraction traits
//!
//! This module defines the traits the store adapters implement so the
//! pipeline core can run against SQL Server and PostgreSQL in production and
//! against in-memory stores in tests.

use crate::domain::{ColumnDecodeError, SalesRecord, StoreResult};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// A row pulled from the source cursor
///
/// The outer `StoreResult` of a [`SourceRows`] item reports cursor failures;
/// this inner result reports a row whose columns could not be decoded.
pub type SourceRow = std::result::Result<SalesRecord, ColumnDecodeError>;

/// Lazy, finite stream of rows from an open source cursor
///
/// The stream borrows the source connection and cannot be restarted once
/// partially consumed.
pub type SourceRows<'a> = BoxStream<'a, StoreResult<SourceRow>>;

/// Readable source store
#[async_trait]
pub trait SourceStore: Send {
    /// Test the connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot answer a trivial query.
    async fn ping(&mut self) -> StoreResult<()>;

    /// Open a streaming cursor for a read-only query
    ///
    /// The query selects the columns in [`crate::domain::SOURCE_COLUMNS`]
    /// order; the adapter decodes them positionally into [`SalesRecord`]s.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be issued.
    async fn open_cursor(&mut self, query: &str) -> StoreResult<SourceRows<'_>>;
}

/// Writable target store
#[async_trait]
pub trait TargetStore: Send {
    /// Test the connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot answer a trivial query.
    async fn ping(&mut self) -> StoreResult<()>;

    /// Execute a DDL statement outside any transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    async fn execute_ddl(&mut self, ddl: &str) -> StoreResult<()>;

    /// Begin a transaction
    ///
    /// Dropping the returned transaction without calling
    /// [`TargetTransaction::commit`] rolls it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    async fn begin(&mut self) -> StoreResult<Box<dyn TargetTransaction + '_>>;
}

/// An open transaction on the target store
#[async_trait]
pub trait TargetTransaction: Send {
    /// Prepare the parameterized insert statement used by
    /// [`TargetTransaction::insert`]
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be prepared.
    async fn prepare_insert(&mut self, sql: &str) -> StoreResult<()>;

    /// Execute the prepared insert with the record's twelve positional values
    ///
    /// # Returns
    ///
    /// The number of rows the statement affected: `1` for a new row, `0` when
    /// the identity already existed and the conflict clause skipped it.
    ///
    /// # Errors
    ///
    /// Returns an error on a hard failure, or if no statement was prepared.
    async fn insert(&mut self, record: &SalesRecord) -> StoreResult<u64>;

    /// Commit the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; the store leaves the
    /// transaction aborted.
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Roll the transaction back
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback could not be sent.
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
