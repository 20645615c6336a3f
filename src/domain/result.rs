//! Result type alias for grafex

use super::errors::GrafexError;

/// Result type alias for grafex operations
///
/// # Examples
///
/// ```
/// use grafex::domain::result::Result;
/// use grafex::domain::errors::GrafexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GrafexError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GrafexError>;
