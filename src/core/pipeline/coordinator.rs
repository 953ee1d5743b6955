//! Pipeline coordinator - main orchestrator for a replication run
//!
//! This module runs the three pipeline stages in order against any pair of
//! stores, and connects the production SQL Server and PostgreSQL stores from
//! configuration.

use super::extract::Extractor;
use super::load::{LoadOptions, Loader};
use super::schema::ensure_target_table;
use super::summary::RunSummary;
use crate::adapters::database::{SourceStore, TargetStore};
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLTarget};
use crate::adapters::sqlserver::SqlServerSource;
use crate::config::SalesyncConfig;
use crate::domain::{PipelineError, Result, SalesyncError, TableName};
use chrono::Utc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Tables and mode for one run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Table read from
    pub source_table: TableName,

    /// Table written to
    pub target_table: TableName,

    /// Roll back instead of committing
    pub dry_run: bool,
}

impl PipelineSettings {
    /// Settings from the `[pipeline]` and `[application]` sections
    pub fn from_config(config: &SalesyncConfig) -> Self {
        Self {
            source_table: config.pipeline.source_table.clone(),
            target_table: config.pipeline.target_table.clone(),
            dry_run: config.application.dry_run,
        }
    }
}

/// Runs one full replication pass
///
/// 1. Ensures the target table exists
/// 2. Opens the ordered source cursor
/// 3. Loads every decodable row in a single transaction
///
/// The run executes inside a `pipeline_run` span carrying its `run_id`.
///
/// # Errors
///
/// Returns the first fatal [`PipelineError`]; the target is left without
/// any of this run's rows.
pub async fn run_pipeline(
    source: &mut dyn SourceStore,
    target: &mut dyn TargetStore,
    settings: &PipelineSettings,
) -> std::result::Result<RunSummary, PipelineError> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("pipeline_run", run_id = %run_id);

    async move {
        let start_time = Instant::now();
        let started_at = Utc::now();

        tracing::info!(
            source_table = %settings.source_table,
            target_table = %settings.target_table,
            dry_run = settings.dry_run,
            "Starting pipeline run"
        );

        ensure_target_table(target, &settings.target_table).await?;

        let mut extractor = Extractor::open(source, &settings.source_table).await?;
        let loader = Loader::new(LoadOptions {
            target_table: settings.target_table.clone(),
            dry_run: settings.dry_run,
        });
        let report = loader.load(target, &mut extractor).await?;

        let summary = RunSummary::new(
            run_id,
            started_at,
            settings.source_table.clone(),
            settings.target_table.clone(),
            &report,
            extractor.rows_skipped(),
        )
        .with_duration(start_time.elapsed());

        summary.log_summary();
        Ok(summary)
    }
    .instrument(span)
    .await
}

/// Pipeline coordinator
///
/// Owns the production stores for one run.
pub struct PipelineCoordinator {
    source: SqlServerSource,
    target: PostgreSQLTarget,
    settings: PipelineSettings,
    // Keeps the pool alive for as long as its connection is checked out
    _pool: PostgreSQLClient,
}

impl PipelineCoordinator {
    /// Connect to both stores
    ///
    /// Each store is pinged before the coordinator is returned, so a bad
    /// credential or unreachable host fails here rather than mid-run.
    ///
    /// # Errors
    ///
    /// Returns a connection error if either store cannot be reached, and a
    /// configuration error if a connection string is malformed.
    pub async fn connect(config: &SalesyncConfig) -> Result<Self> {
        let mut source = SqlServerSource::connect(&config.source).await?;
        source
            .ping()
            .await
            .map_err(|e| SalesyncError::Connection(format!("SQL Server ping failed: {e}")))?;

        let pool = PostgreSQLClient::new(&config.target)?;
        let mut target = PostgreSQLTarget::new(pool.get_connection().await?);
        target
            .ping()
            .await
            .map_err(|e| SalesyncError::Connection(format!("PostgreSQL ping failed: {e}")))?;
        tracing::info!("Connected to PostgreSQL");

        Ok(Self {
            source,
            target,
            settings: PipelineSettings::from_config(config),
            _pool: pool,
        })
    }

    /// Settings the run will use
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Execute the pipeline
    ///
    /// # Errors
    ///
    /// Returns [`SalesyncError::Pipeline`] if the run fails.
    pub async fn execute(&mut self) -> Result<RunSummary> {
        let summary = run_pipeline(&mut self.source, &mut self.target, &self.settings).await?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::{MemorySource, MemoryTarget};
    use crate::config::{PostgreSQLConfig, SqlServerConfig};
    use crate::domain::SalesRecord;

    fn settings(dry_run: bool) -> PipelineSettings {
        PipelineSettings {
            source_table: TableName::new("Sales").unwrap(),
            target_table: TableName::new("SalesDB").unwrap(),
            dry_run,
        }
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = SalesyncConfig {
            application: Default::default(),
            source: SqlServerConfig::new("sqlserver://sa:pw@localhost?database=sales"),
            target: PostgreSQLConfig::new("postgresql://etl@localhost/replica"),
            pipeline: Default::default(),
            logging: Default::default(),
        };
        config.application.dry_run = true;
        config.pipeline.target_table = TableName::new("analytics.sales").unwrap();

        let settings = PipelineSettings::from_config(&config);
        assert_eq!(settings.source_table.as_str(), "Sales");
        assert_eq!(settings.target_table.as_str(), "analytics.sales");
        assert!(settings.dry_run);
    }

    #[tokio::test]
    async fn test_run_pipeline_end_to_end() {
        let mut source = MemorySource::from_records([
            SalesRecord::with_fsno("FS-2"),
            SalesRecord::with_fsno("FS-1"),
        ]);
        let mut target = MemoryTarget::new();

        let summary = run_pipeline(&mut source, &mut target, &settings(false))
            .await
            .unwrap();

        assert_eq!(summary.rows_processed, 2);
        assert_eq!(summary.rows_inserted, 2);
        assert_eq!(summary.source_table.as_str(), "Sales");
        assert!(!summary.dry_run);
        assert_eq!(target.len(), 2);
        assert!(target.ddl()[0].contains("CREATE TABLE IF NOT EXISTS SalesDB"));
        assert_eq!(
            source.queries(),
            ["SELECT fsno, salestype, attachmentno, customer, region, date, code, name, \
              measurementunit, unitprice, soldquantity, netpay FROM Sales ORDER BY fsno"]
        );
    }

    #[tokio::test]
    async fn test_schema_failure_stops_before_extraction() {
        let mut source = MemorySource::from_records([SalesRecord::with_fsno("FS-1")]);
        let mut target = MemoryTarget::new().fail_ddl("permission denied");

        let err = run_pipeline(&mut source, &mut target, &settings(false))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Schema { .. }));
        assert!(source.queries().is_empty());
    }

    #[tokio::test]
    async fn test_each_run_gets_a_new_id() {
        let mut source = MemorySource::from_records([SalesRecord::with_fsno("FS-1")]);
        let mut target = MemoryTarget::new();

        let first = run_pipeline(&mut source, &mut target, &settings(true))
            .await
            .unwrap();
        let second = run_pipeline(&mut source, &mut target, &settings(true))
            .await
            .unwrap();

        assert_ne!(first.run_id, second.run_id);
    }
}
