//! Run summary and reporting
//!
//! This module defines the structure reported at the end of a pipeline run.

use super::load::LoadReport;
use crate::domain::TableName;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;
use uuid::Uuid;

/// Summary of a successful pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique identifier of the run, also recorded on the run's log span
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Table read from
    pub source_table: TableName,

    /// Table written to
    pub target_table: TableName,

    /// Rows handed to the insert statement, including conflicts
    pub rows_processed: u64,

    /// Rows newly inserted
    pub rows_inserted: u64,

    /// Rows skipped because their identity already existed
    pub conflicts_skipped: u64,

    /// Source rows skipped because they could not be decoded
    pub rows_skipped: u64,

    /// Duration of the run
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Whether the load was rolled back instead of committed
    pub dry_run: bool,
}

impl RunSummary {
    /// Create a summary from a completed load
    pub fn new(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        source_table: TableName,
        target_table: TableName,
        load: &LoadReport,
        rows_skipped: u64,
    ) -> Self {
        Self {
            run_id,
            started_at,
            source_table,
            target_table,
            rows_processed: load.rows_processed,
            rows_inserted: load.rows_inserted,
            conflicts_skipped: load.conflicts_skipped(),
            rows_skipped,
            duration: Duration::from_secs(0),
            dry_run: !load.committed,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            source_table = %self.source_table,
            target_table = %self.target_table,
            rows_processed = self.rows_processed,
            rows_inserted = self.rows_inserted,
            conflicts_skipped = self.conflicts_skipped,
            rows_skipped = self.rows_skipped,
            duration_ms = self.duration.as_millis() as u64,
            dry_run = self.dry_run,
            "Migrated {} rows in {:?}",
            self.rows_processed,
            self.duration
        );

        if self.rows_skipped > 0 {
            tracing::warn!(
                rows_skipped = self.rows_skipped,
                "Some source rows could not be decoded and were skipped"
            );
        }
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
