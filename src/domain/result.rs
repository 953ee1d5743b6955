//! Result type alias for Salesync

use super::errors::SalesyncError;

/// Result type alias for Salesync operations
///
/// This is a convenience type alias that uses `SalesyncError` as the error type.
///
/// # Examples
///
/// ```
/// use salesync::domain::result::Result;
/// use salesync::domain::errors::SalesyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SalesyncError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SalesyncError>;

/// Result type returned by store adapters
pub type StoreResult<T> = std::result::Result<T, super::errors::StoreError>;
