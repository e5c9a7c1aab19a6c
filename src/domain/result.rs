//! Result type alias for EcoLogistics
//!
//! This module provides a convenient Result type alias that uses EcoError
//! as the error type.

use super::errors::EcoError;

/// Result type alias for EcoLogistics operations
///
/// # Examples
///
/// ```
/// use ecologistics::domain::result::Result;
/// use ecologistics::domain::errors::EcoError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(EcoError::InvalidRecord("id requerido".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, EcoError>;
