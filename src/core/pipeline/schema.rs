//! Target schema ensurer
//!
//! Creates the destination table when it is missing. The DDL is
//! `CREATE TABLE IF NOT EXISTS`, so it is safe to apply on every run and
//! never alters an existing table.

use crate::adapters::database::TargetStore;
use crate::domain::{PipelineError, TableName, COLUMN_COUNT, IDENTITY_COLUMN, TARGET_COLUMNS};

/// PostgreSQL types of [`TARGET_COLUMNS`], position for position
const TARGET_COLUMN_TYPES: [&str; COLUMN_COUNT] = [
    "VARCHAR(50)",
    "VARCHAR(50)",
    "VARCHAR(50)",
    "VARCHAR(100)",
    "VARCHAR(50)",
    "DATE",
    "VARCHAR(50)",
    "VARCHAR(100)",
    "VARCHAR(50)",
    "NUMERIC(12, 2)",
    "NUMERIC(12, 2)",
    "NUMERIC(12, 2)",
];

/// Builds the DDL for the target table
///
/// # Examples
///
/// ```
/// use salesync::core::pipeline::create_table_sql;
/// use salesync::domain::TableName;
///
/// let sql = create_table_sql(&TableName::new("SalesDB").unwrap());
/// assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS SalesDB ("));
/// assert!(sql.contains("fsno VARCHAR(50) PRIMARY KEY"));
/// ```
pub fn create_table_sql(table: &TableName) -> String {
    let columns: Vec<String> = TARGET_COLUMNS
        .iter()
        .zip(TARGET_COLUMN_TYPES.iter())
        .map(|(name, sql_type)| {
            if *name == IDENTITY_COLUMN {
                format!("    {name} {sql_type} PRIMARY KEY")
            } else {
                format!("    {name} {sql_type}")
            }
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n{}\n)",
        columns.join(",\n")
    )
}

/// Ensures the target table exists
///
/// # Errors
///
/// Returns [`PipelineError::Schema`] if the DDL cannot be applied.
pub async fn ensure_target_table(
    target: &mut dyn TargetStore,
    table: &TableName,
) -> Result<(), PipelineError> {
    let ddl = create_table_sql(table);
    tracing::debug!(table = %table, "Ensuring target table exists");

    target
        .execute_ddl(&ddl)
        .await
        .map_err(|e| PipelineError::Schema {
            table: table.to_string(),
            message: e.to_string(),
        })?;

    tracing::info!(table = %table, "Target table ready");
    Ok(())
}
