//! Domain error types
//!
//! This module defines the error hierarchy for grafex.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main grafex error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum GrafexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Errors talking to the platform API
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Directory creation or file write failures
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl GrafexError {
    /// Returns true if the error came from the platform API
    pub fn is_fetch(&self) -> bool {
        matches!(self, GrafexError::Fetch(_))
    }
}

/// Platform API errors
///
/// Errors that occur when retrieving listings or item details.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to connect to the server
    #[error("Failed to connect to server: {0}")]
    ConnectionFailed(String),

    /// Credentials rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response could not be decoded or lacked a required member
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl FetchError {
    /// Maps a non-success HTTP status and response body to a fetch error
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => FetchError::AuthenticationFailed(format!("status {status}: {message}")),
            404 => FetchError::NotFound(message),
            400..=499 => FetchError::ClientError { status, message },
            _ => FetchError::ServerError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for GrafexError {
    fn from(err: std::io::Error) -> Self {
        GrafexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GrafexError {
    fn from(err: serde_json::Error) -> Self {
        GrafexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GrafexError {
    fn from(err: toml::de::Error) -> Self {
        GrafexError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grafex_error_display() {
        let err = GrafexError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_fetch_error_conversion() {
        let fetch_err = FetchError::ConnectionFailed("Network error".to_string());
        let err: GrafexError = fetch_err.into();
        assert!(err.is_fetch());
        assert!(matches!(err, GrafexError::Fetch(_)));
    }

    #[test]
    fn test_fetch_error_from_status() {
        assert!(matches!(
            FetchError::from_status(401, "bad token"),
            FetchError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            FetchError::from_status(403, "forbidden"),
            FetchError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            FetchError::from_status(404, "missing"),
            FetchError::NotFound(_)
        ));
        assert!(matches!(
            FetchError::from_status(422, "bad"),
            FetchError::ClientError { status: 422, .. }
        ));
        assert!(matches!(
            FetchError::from_status(502, "gateway"),
            FetchError::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn test_server_error_display() {
        let err = FetchError::ServerError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Server error: 500 - boom");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: GrafexError = io_err.into();
        assert!(matches!(err, GrafexError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: GrafexError = json_err.into();
        assert!(matches!(err, GrafexError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: GrafexError = toml_err.into();
        assert!(matches!(err, GrafexError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_grafex_error_implements_std_error() {
        let err = GrafexError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
