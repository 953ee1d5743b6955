//! Domain identifier types with validation
//!
//! Table names are spliced into generated SQL, so they are validated once at
//! construction and carried as a newtype from then on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest identifier part PostgreSQL keeps without truncation
const MAX_IDENTIFIER_LEN: usize = 63;

/// Table name newtype wrapper
///
/// Accepts `table` or `schema.table`. Every part must start with an ASCII
/// letter or underscore and contain only ASCII letters, digits and
/// underscores.
///
/// # Examples
///
/// ```
/// use salesync::domain::ids::TableName;
///
/// let table = TableName::new("analytics.SalesDB").unwrap();
/// assert_eq!(table.as_str(), "analytics.SalesDB");
///
/// assert!(TableName::new("Sales; DROP TABLE Sales").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Creates a new TableName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(TableName)` if the name is a plain or schema-qualified
    /// identifier, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Table name cannot be empty".to_string());
        }

        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 {
            return Err(format!(
                "Table name '{name}' may have at most one schema qualifier"
            ));
        }

        for part in &parts {
            validate_identifier_part(part)
                .map_err(|reason| format!("Invalid table name '{name}': {reason}"))?;
        }

        Ok(Self(name))
    }

    /// Returns the table name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn validate_identifier_part(part: &str) -> Result<(), String> {
    if part.is_empty() {
        return Err("empty identifier part".to_string());
    }
    if part.len() > MAX_IDENTIFIER_LEN {
        return Err(format!(
            "identifier '{part}' exceeds {MAX_IDENTIFIER_LEN} characters"
        ));
    }

    let mut chars = part.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "identifier '{part}' must match [A-Za-z_][A-Za-z0-9_]*"
        ));
    }

    Ok(())
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Sales" ; "plain")]
    #[test_case("SalesDB" ; "mixed case")]
    #[test_case("_staging_sales" ; "leading underscore")]
    #[test_case("analytics.sales_2024" ; "schema qualified")]
    fn test_table_name_valid(name: &str) {
        let table = TableName::new(name).unwrap();
        assert_eq!(table.as_str(), name);
        assert_eq!(table.to_string(), name);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("1sales" ; "leading digit")]
    #[test_case("sales-db" ; "hyphen")]
    #[test_case("Sales; DROP TABLE Sales" ; "injection")]
    #[test_case("a.b.c" ; "too many parts")]
    #[test_case("analytics." ; "empty part")]
    #[test_case("\"Sales\"" ; "quoted")]
    fn test_table_name_invalid(name: &str) {
        assert!(TableName::new(name).is_err());
    }

    #[test]
    fn test_table_name_too_long() {
        let name = "s".repeat(64);
        let err = TableName::new(name).unwrap_err();
        assert!(err.contains("exceeds 63 characters"));
    }

    #[test]
    fn test_table_name_from_str() {
        let table: TableName = "SalesDB".parse().unwrap();
        assert_eq!(table.into_inner(), "SalesDB");
    }

    #[test]
    fn test_table_name_serde_validates() {
        #[derive(Deserialize)]
        struct Wrapper {
            table: TableName,
        }

        let ok: Wrapper = toml::from_str("table = \"SalesDB\"").unwrap();
        assert_eq!(ok.table.as_str(), "SalesDB");

        let bad = toml::from_str::<Wrapper>("table = \"Sales DB\"");
        assert!(bad.is_err());
    }
}
