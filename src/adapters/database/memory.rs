//! In-memory stores
//!
//! [`MemorySource`] and [`MemoryTarget`] implement the store traits without a
//! database. They emulate the behaviour the pipeline depends on: ordered
//! cursors, `ON CONFLICT DO NOTHING`, transaction isolation and rollback on
//! drop. Failures can be injected at every step, which makes them the test
//! doubles for the pipeline's atomicity and idempotence guarantees.

use crate::adapters::database::traits::{
    SourceRow, SourceRows, SourceStore, TargetStore, TargetTransaction,
};
use crate::domain::{ColumnDecodeError, SalesRecord, StoreError, StoreResult};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;

/// In-memory source table
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: Vec<(Option<String>, SourceRow)>,
    query_failure: Option<String>,
    cursor_failure: Option<(usize, String)>,
    queries: Vec<String>,
}

impl MemorySource {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding the given records
    pub fn from_records(records: impl IntoIterator<Item = SalesRecord>) -> Self {
        let mut source = Self::new();
        for record in records {
            source.push(record);
        }
        source
    }

    /// Adds a decodable row
    pub fn push(&mut self, record: SalesRecord) {
        self.rows.push((record.fsno.clone(), Ok(record)));
    }

    /// Adds a row that fails to decode
    ///
    /// `fsno` only positions the row in the ordered cursor.
    pub fn push_malformed(&mut self, fsno: impl Into<String>, error: ColumnDecodeError) {
        self.rows.push((Some(fsno.into()), Err(error)));
    }

    /// Makes [`SourceStore::open_cursor`] fail
    pub fn fail_query(mut self, message: impl Into<String>) -> Self {
        self.query_failure = Some(message.into());
        self
    }

    /// Makes the cursor fail after yielding `rows` rows
    pub fn fail_cursor_after(mut self, rows: usize, message: impl Into<String>) -> Self {
        self.cursor_failure = Some((rows, message.into()));
        self
    }

    /// Queries received so far
    pub fn queries(&self) -> &[String] {
        &self.queries
    }
}

#[async_trait]
impl SourceStore for MemorySource {
    async fn ping(&mut self) -> StoreResult<()> {
        Ok(())
    }

    async fn open_cursor(&mut self, query: &str) -> StoreResult<SourceRows<'_>> {
        self.queries.push(query.to_string());

        if let Some(message) = &self.query_failure {
            return Err(StoreError::new(message.clone()));
        }

        let mut rows = self.rows.clone();
        if query.trim_end().ends_with("ORDER BY fsno") {
            // NULL identities sort first, as SQL Server does for ascending order
            rows.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let mut items: Vec<StoreResult<SourceRow>> =
            rows.into_iter().map(|(_, row)| Ok(row)).collect();
        if let Some((after, message)) = &self.cursor_failure {
            items.truncate(*after);
            items.push(Err(StoreError::new(message.clone())));
        }

        Ok(stream::iter(items).boxed())
    }
}

/// In-memory target table keyed by identity
#[derive(Debug, Default)]
pub struct MemoryTarget {
    table: BTreeMap<String, SalesRecord>,
    table_ready: bool,
    ddl: Vec<String>,
    ddl_failure: Option<String>,
    begin_failure: Option<String>,
    insert_failure: Option<(String, String)>,
    commit_failure: Option<String>,
    commits: usize,
    rollbacks: usize,
    prepares: usize,
}

impl MemoryTarget {
    /// Creates an empty target with no table
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes [`TargetStore::execute_ddl`] fail
    pub fn fail_ddl(mut self, message: impl Into<String>) -> Self {
        self.ddl_failure = Some(message.into());
        self
    }

    /// Makes [`TargetStore::begin`] fail
    pub fn fail_begin(mut self, message: impl Into<String>) -> Self {
        self.begin_failure = Some(message.into());
        self
    }

    /// Makes inserting the row with this identity a hard error
    pub fn fail_insert_of(mut self, fsno: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert_failure = Some((fsno.into(), message.into()));
        self
    }

    /// Makes [`TargetTransaction::commit`] fail
    pub fn fail_commit(mut self, message: impl Into<String>) -> Self {
        self.commit_failure = Some(message.into());
        self
    }

    /// Clears injected failures, keeping table contents
    pub fn heal(&mut self) {
        self.ddl_failure = None;
        self.begin_failure = None;
        self.insert_failure = None;
        self.commit_failure = None;
    }

    /// Committed rows in identity order
    pub fn rows(&self) -> Vec<&SalesRecord> {
        self.table.values().collect()
    }

    /// Committed row for an identity
    pub fn get(&self, fsno: &str) -> Option<&SalesRecord> {
        self.table.get(fsno)
    }

    /// Number of committed rows
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no rows are committed
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether the table was created
    pub fn table_ready(&self) -> bool {
        self.table_ready
    }

    /// DDL statements received so far
    pub fn ddl(&self) -> &[String] {
        &self.ddl
    }

    /// Successful commits
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Rollbacks, explicit or on drop
    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }

    /// Statements prepared across all transactions
    pub fn prepares(&self) -> usize {
        self.prepares
    }
}

#[async_trait]
impl TargetStore for MemoryTarget {
    async fn ping(&mut self) -> StoreResult<()> {
        Ok(())
    }

    async fn execute_ddl(&mut self, ddl: &str) -> StoreResult<()> {
        self.ddl.push(ddl.to_string());
        if let Some(message) = &self.ddl_failure {
            return Err(StoreError::new(message.clone()));
        }
        self.table_ready = true;
        Ok(())
    }

    async fn begin(&mut self) -> StoreResult<Box<dyn TargetTransaction + '_>> {
        if let Some(message) = &self.begin_failure {
            return Err(StoreError::new(message.clone()));
        }
        Ok(Box::new(MemoryTransaction {
            target: self,
            pending: BTreeMap::new(),
            statement: None,
            finished: false,
        }))
    }
}

struct MemoryTransaction<'a> {
    target: &'a mut MemoryTarget,
    pending: BTreeMap<String, SalesRecord>,
    statement: Option<String>,
    finished: bool,
}

#[async_trait]
impl<'a> TargetTransaction for MemoryTransaction<'a> {
    async fn prepare_insert(&mut self, sql: &str) -> StoreResult<()> {
        if !self.target.table_ready {
            return Err(StoreError::new("relation does not exist"));
        }
        self.target.prepares += 1;
        self.statement = Some(sql.to_string());
        Ok(())
    }

    async fn insert(&mut self, record: &SalesRecord) -> StoreResult<u64> {
        if self.statement.is_none() {
            return Err(StoreError::new("insert executed without a prepared statement"));
        }

        let Some(fsno) = record.fsno.clone() else {
            return Err(StoreError::new(
                "null value in column \"fsno\" violates not-null constraint",
            ));
        };

        if let Some((failing, message)) = &self.target.insert_failure {
            if *failing == fsno {
                return Err(StoreError::new(message.clone()));
            }
        }

        if self.target.table.contains_key(&fsno) || self.pending.contains_key(&fsno) {
            return Ok(0);
        }

        self.pending.insert(fsno, record.clone());
        Ok(1)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let mut tx = self;
        tx.finished = true;
        if let Some(message) = tx.target.commit_failure.clone() {
            tx.target.rollbacks += 1;
            return Err(StoreError::new(message));
        }

        let pending = std::mem::take(&mut tx.pending);
        tx.target.table.extend(pending);
        tx.target.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        let mut tx = self;
        tx.finished = true;
        tx.target.rollbacks += 1;
        Ok(())
    }
}

impl<'a> Drop for MemoryTransaction<'a> {
    fn drop(&mut self) {
        if !self.finished {
            self.target.rollbacks += 1;
        }
    }
}
