//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SalesyncConfig;
use crate::config::secret_string;
use crate::domain::errors::SalesyncError;
use crate::domain::result::Result;
use crate::domain::TableName;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Configuration file picked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "salesync.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SalesyncConfig
/// 4. Applies environment variable overrides (SALESYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use salesync::config::loader::load_config;
///
/// let config = load_config("salesync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SalesyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SalesyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SalesyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SalesyncConfig = toml::from_str(&contents)
        .map_err(|e| SalesyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SalesyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Resolves the configuration for a run
///
/// An explicit path must exist. Without one, `salesync.toml` in the working
/// directory is used if present; otherwise the configuration comes from
/// `MSSQL_CONN` and `POSTGRES_CONN`. Overrides and validation apply in every
/// case.
///
/// # Errors
///
/// Returns a configuration error if no source of configuration is usable.
pub fn resolve_config(path: Option<&str>) -> Result<SalesyncConfig> {
    if let Some(path) = path {
        return load_config(path);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        tracing::debug!(path = DEFAULT_CONFIG_PATH, "Using default configuration file");
        return load_config(DEFAULT_CONFIG_PATH);
    }

    tracing::debug!("No configuration file, reading connection strings from environment");
    let mut config = SalesyncConfig::from_env().map_err(SalesyncError::Configuration)?;
    apply_env_overrides(&mut config)?;
    config.validate().map_err(|e| {
        SalesyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SalesyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn table_override(var: &str, value: String) -> Result<TableName> {
    TableName::new(value).map_err(|e| SalesyncError::Configuration(format!("{var}: {e}")))
}

fn bool_override(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(SalesyncError::Configuration(format!(
            "{var}: expected true or false, got '{value}'"
        ))),
    }
}

fn seconds_override(var: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        SalesyncError::Configuration(format!(
            "{var}: expected a whole number of seconds, got '{value}'"
        ))
    })
}

/// Applies environment variable overrides using SALESYNC_* prefix
///
/// Environment variables follow the pattern: SALESYNC_<SECTION>_<KEY>
/// For example: SALESYNC_TARGET_SSL_MODE, SALESYNC_PIPELINE_TARGET_TABLE
fn apply_env_overrides(config: &mut SalesyncConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("SALESYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SALESYNC_APPLICATION_DRY_RUN") {
        config.application.dry_run = bool_override("SALESYNC_APPLICATION_DRY_RUN", &val)?;
    }

    // Source overrides
    if let Ok(val) = std::env::var("SALESYNC_SOURCE_CONNECTION_STRING") {
        config.source.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("SALESYNC_SOURCE_CONNECTION_TIMEOUT_SECONDS") {
        config.source.connection_timeout_seconds =
            seconds_override("SALESYNC_SOURCE_CONNECTION_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("SALESYNC_SOURCE_TRUST_SERVER_CERTIFICATE") {
        config.source.trust_server_certificate =
            bool_override("SALESYNC_SOURCE_TRUST_SERVER_CERTIFICATE", &val)?;
    }

    // Target overrides
    if let Ok(val) = std::env::var("SALESYNC_TARGET_CONNECTION_STRING") {
        config.target.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("SALESYNC_TARGET_CONNECTION_TIMEOUT_SECONDS") {
        config.target.connection_timeout_seconds =
            seconds_override("SALESYNC_TARGET_CONNECTION_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("SALESYNC_TARGET_SSL_MODE") {
        config.target.ssl_mode = val;
    }

    // Pipeline overrides
    if let Ok(val) = std::env::var("SALESYNC_PIPELINE_SOURCE_TABLE") {
        config.pipeline.source_table = table_override("SALESYNC_PIPELINE_SOURCE_TABLE", val)?;
    }
    if let Ok(val) = std::env::var("SALESYNC_PIPELINE_TARGET_TABLE") {
        config.pipeline.target_table = table_override("SALESYNC_PIPELINE_TARGET_TABLE", val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SALESYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = bool_override("SALESYNC_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("SALESYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
