//! Transactional loader
//!
//! Drains the extractor into the target inside a single transaction. The
//! insert statement is prepared once and carries `ON CONFLICT (fsno) DO
//! NOTHING`, so rows already present are skipped rather than updated. Any
//! hard error rolls the whole transaction back.

use super::extract::Extractor;
use crate::adapters::database::{TargetStore, TargetTransaction};
use crate::domain::{PipelineError, TableName, COLUMN_COUNT, IDENTITY_COLUMN, TARGET_COLUMNS};
use serde::Serialize;

/// Rows between progress log lines
const PROGRESS_INTERVAL: u64 = 10_000;

/// Builds the parameterized insert statement
///
/// # Examples
///
/// ```
/// use salesync::core::pipeline::insert_sql;
/// use salesync::domain::TableName;
///
/// let sql = insert_sql(&TableName::new("SalesDB").unwrap());
/// assert!(sql.ends_with("$11, $12) ON CONFLICT (fsno) DO NOTHING"));
/// ```
pub fn insert_sql(table: &TableName) -> String {
    let placeholders: Vec<String> = (1..=COLUMN_COUNT).map(|i| format!("${i}")).collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO NOTHING",
        table,
        TARGET_COLUMNS.join(", "),
        placeholders.join(", "),
        IDENTITY_COLUMN
    )
}

/// Loader settings
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Table receiving the rows
    pub target_table: TableName,

    /// Roll back instead of committing
    pub dry_run: bool,
}

/// Outcome of a completed load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows handed to the insert statement
    pub rows_processed: u64,

    /// Rows the target reported as inserted
    pub rows_inserted: u64,

    /// Whether the transaction was committed (false on a dry run)
    pub committed: bool,
}

impl LoadReport {
    /// Rows skipped because their identity already existed
    pub fn conflicts_skipped(&self) -> u64 {
        self.rows_processed - self.rows_inserted
    }
}

/// Transactional loader
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    /// Create a new loader
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load every record the extractor yields
    ///
    /// Nothing is committed unless the extractor is drained without a hard
    /// error; every failure path rolls the transaction back.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Transaction`] if the transaction cannot begin or
    ///   the statement cannot be prepared
    /// - [`PipelineError::Cursor`] if the source cursor fails
    /// - [`PipelineError::Load`] if an insert fails for a reason other than
    ///   a key conflict
    /// - [`PipelineError::Commit`] if the commit fails
    pub async fn load(
        &self,
        target: &mut dyn TargetStore,
        extractor: &mut Extractor<'_>,
    ) -> Result<LoadReport, PipelineError> {
        let table = &self.options.target_table;

        let mut txn = target
            .begin()
            .await
            .map_err(|e| PipelineError::Transaction(e.to_string()))?;

        let sql = insert_sql(table);
        let prepared = txn.prepare_insert(&sql).await;
        if let Err(e) = prepared {
            abort(txn).await;
            return Err(PipelineError::Transaction(format!(
                "could not prepare insert into {table}: {e}"
            )));
        }

        let mut report = LoadReport::default();

        loop {
            let record = match extractor.next_record().await {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) => {
                    abort(txn).await;
                    return Err(e);
                }
            };

            let outcome = txn.insert(&record).await;
            match outcome {
                Ok(affected) => {
                    report.rows_processed += 1;
                    report.rows_inserted += affected;
                }
                Err(e) => {
                    tracing::error!(
                        fsno = record.identity(),
                        rows_processed = report.rows_processed,
                        error = %e,
                        "Insert failed, rolling back"
                    );
                    abort(txn).await;
                    return Err(PipelineError::Load {
                        fsno: record.identity().to_string(),
                        rows_processed: report.rows_processed,
                        message: e.to_string(),
                    });
                }
            }

            if report.rows_processed % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    rows_processed = report.rows_processed,
                    rows_inserted = report.rows_inserted,
                    "Load progress"
                );
            }
        }

        if self.options.dry_run {
            if let Err(e) = txn.rollback().await {
                tracing::warn!(error = %e, "Dry run rollback failed");
            }
            tracing::info!(
                rows_processed = report.rows_processed,
                rows_inserted = report.rows_inserted,
                "Dry run: transaction rolled back"
            );
            return Ok(report);
        }

        txn.commit().await.map_err(|e| PipelineError::Commit {
            rows_processed: report.rows_processed,
            message: e.to_string(),
        })?;
        report.committed = true;

        tracing::debug!(
            table = %table,
            rows_processed = report.rows_processed,
            "Transaction committed"
        );
        Ok(report)
    }
}

async fn abort(txn: Box<dyn TargetTransaction + '_>) {
    if let Err(e) = txn.rollback().await {
        tracing::warn!(error = %e, "Rollback failed");
    }
}
