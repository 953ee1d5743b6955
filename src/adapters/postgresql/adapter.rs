//! PostgreSQL target implementation
//!
//! This module implements [`TargetStore`] on a pooled tokio-postgres
//! connection.

use crate::adapters::database::traits::{TargetStore, TargetTransaction};
use crate::domain::{SalesRecord, StoreError, StoreResult, COLUMN_COUNT};
use async_trait::async_trait;
use deadpool_postgres::Object;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Statement, Transaction};

fn store_error(err: tokio_postgres::Error) -> StoreError {
    // SQLSTATE and server message instead of the bare "db error"
    match err.as_db_error() {
        Some(db) => StoreError::new(format!("{}: {}", db.code().code(), db.message())),
        None => StoreError::new(err.to_string()),
    }
}

/// PostgreSQL target store
///
/// Holds one connection for the whole run.
pub struct PostgreSQLTarget {
    client: Object,
}

impl PostgreSQLTarget {
    /// Create a new target on a pooled connection
    pub fn new(client: Object) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TargetStore for PostgreSQLTarget {
    async fn ping(&mut self) -> StoreResult<()> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn execute_ddl(&mut self, ddl: &str) -> StoreResult<()> {
        self.client.batch_execute(ddl).await.map_err(store_error)
    }

    async fn begin(&mut self) -> StoreResult<Box<dyn TargetTransaction + '_>> {
        let client: &mut tokio_postgres::Client = &mut self.client;
        let txn = client.transaction().await.map_err(store_error)?;

        Ok(Box::new(PostgreSQLTransaction {
            txn,
            statement: None,
        }))
    }
}

/// An open load transaction
///
/// tokio-postgres rolls the transaction back if it is dropped without a
/// commit.
struct PostgreSQLTransaction<'a> {
    txn: Transaction<'a>,
    statement: Option<Statement>,
}

#[async_trait]
impl<'a> TargetTransaction for PostgreSQLTransaction<'a> {
    async fn prepare_insert(&mut self, sql: &str) -> StoreResult<()> {
        let statement = self.txn.prepare(sql).await.map_err(store_error)?;
        self.statement = Some(statement);
        Ok(())
    }

    async fn insert(&mut self, record: &SalesRecord) -> StoreResult<u64> {
        let statement = self
            .statement
            .as_ref()
            .ok_or_else(|| StoreError::new("insert executed without a prepared statement"))?;

        let params: [&(dyn ToSql + Sync); COLUMN_COUNT] = [
            &record.fsno,
            &record.sale_type,
            &record.attachment_no,
            &record.customer,
            &record.region,
            &record.date,
            &record.code,
            &record.name,
            &record.measurement_unit,
            &record.unit_price,
            &record.sold_quantity,
            &record.net_pay,
        ];

        self.txn
            .execute(statement, &params)
            .await
            .map_err(store_error)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let this = *self;
        this.txn.commit().await.map_err(store_error)
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        let this = *self;
        this.txn.rollback().await.map_err(store_error)
    }
}
