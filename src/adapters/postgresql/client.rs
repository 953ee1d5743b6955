//! PostgreSQL client implementation
//!
//! This module provides the connection pool for the PostgreSQL target.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{Result, SalesyncError};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::NoTls;

/// The pipeline runs its DDL and its single load transaction on one
/// connection
const POOL_SIZE: usize = 1;

/// PostgreSQL client for Salesync
///
/// Wraps a deadpool connection pool built from the target configuration,
/// with TLS chosen by `ssl_mode`.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until [`PostgreSQLClient::get_connection`].
    ///
    /// # Arguments
    ///
    /// * `config` - PostgreSQL configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection string cannot be
    /// parsed or the TLS connector cannot be built.
    pub fn new(config: &PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_str()
            .parse()
            .map_err(|e| {
                SalesyncError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
            })?;

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        pg_config.connect_timeout(timeout);
        pg_config.application_name("salesync");

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode(SslMode::Disable);
                Manager::from_config(pg_config, NoTls, manager_config)
            }
            mode => {
                pg_config.ssl_mode(if mode == "prefer" {
                    SslMode::Prefer
                } else {
                    SslMode::Require
                });
                Manager::from_config(pg_config, tls_connector(mode)?, manager_config)
            }
        };

        let pool = Pool::builder(manager)
            .max_size(POOL_SIZE)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                SalesyncError::Configuration(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self { pool })
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns a connection error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<Object> {
        self.pool.get().await.map_err(|e| {
            SalesyncError::Connection(format!("Failed to get PostgreSQL connection: {}", e))
        })
    }
}

/// Builds the TLS connector for a non-disabled `ssl_mode`
///
/// `prefer` and `require` encrypt without verifying the server, `verify-ca`
/// checks the chain but not the host name, and `verify-full` checks both.
fn tls_connector(ssl_mode: &str) -> Result<MakeTlsConnector> {
    let (accept_invalid_certs, accept_invalid_hostnames) = match ssl_mode {
        "verify-full" => (false, false),
        "verify-ca" => (false, true),
        _ => (true, true),
    };

    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(accept_invalid_certs)
        .danger_accept_invalid_hostnames(accept_invalid_hostnames)
        .build()
        .map_err(|e| SalesyncError::Configuration(format!("Failed to build TLS connector: {}", e)))?;

    Ok(MakeTlsConnector::new(connector))
}
