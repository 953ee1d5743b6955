//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which resolves and
//! validates the configuration without connecting to either database.

use crate::cli::{exit_code, EXIT_SUCCESS};
use crate::config::{redact_connection_string, SalesyncConfig, DEFAULT_CONFIG_PATH};
use crate::domain::Result;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `loaded` is the outcome of resolving the configuration; loading
    /// already validates, so this reports the result.
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        loaded: Result<SalesyncConfig>,
    ) -> anyhow::Result<i32> {
        let origin = describe_origin(config_path);
        tracing::info!(origin = %origin, "Validating configuration");

        println!("🔍 Validating configuration from {origin}");
        println!();

        match loaded {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                for line in summary_lines(&config) {
                    println!("{line}");
                }
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(exit_code(&e))
            }
        }
    }
}

fn describe_origin(config_path: Option<&str>) -> String {
    match config_path {
        Some(path) => format!("file {path}"),
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            format!("file {DEFAULT_CONFIG_PATH}")
        }
        None => "environment (MSSQL_CONN, POSTGRES_CONN)".to_string(),
    }
}

/// Human-readable configuration summary with credentials redacted
fn summary_lines(config: &SalesyncConfig) -> Vec<String> {
    vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Dry Run: {}", config.application.dry_run),
        format!(
            "  SQL Server: {}",
            redact_connection_string(config.source.connection_string.expose_secret().as_str())
        ),
        format!(
            "  PostgreSQL: {}",
            redact_connection_string(config.target.connection_string.expose_secret().as_str())
        ),
        format!("  PostgreSQL SSL Mode: {}", config.target.ssl_mode),
        format!("  Source Table: {}", config.pipeline.source_table),
        format!("  Target Table: {}", config.pipeline.target_table),
        format!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PostgreSQLConfig, SqlServerConfig};
    use crate::domain::SalesyncError;

    fn config() -> SalesyncConfig {
        SalesyncConfig {
            application: Default::default(),
            source: SqlServerConfig::new("sqlserver://sa:topsecret@db:1433?database=sales"),
            target: PostgreSQLConfig::new("host=replica user=etl password=alsosecret dbname=bi"),
            pipeline: Default::default(),
            logging: Default::default(),
        }
    }

    #[test]
    fn test_summary_redacts_credentials() {
        let text = summary_lines(&config()).join("\n");

        assert!(!text.contains("topsecret"));
        assert!(!text.contains("alsosecret"));
        assert!(text.contains("sqlserver://***@db:1433?database=sales"));
        assert!(text.contains("Target Table: SalesDB"));
    }

    #[test]
    fn test_describe_explicit_origin() {
        assert_eq!(describe_origin(Some("prod.toml")), "file prod.toml");
    }

    #[tokio::test]
    async fn test_execute_reports_exit_codes() {
        let args = ValidateArgs {};

        let ok = args.execute(Some("prod.toml"), Ok(config())).await.unwrap();
        assert_eq!(ok, 0);

        let failed = args
            .execute(
                Some("prod.toml"),
                Err(SalesyncError::Configuration("bad".to_string())),
            )
            .await
            .unwrap();
        assert_eq!(failed, 2);
    }
}
