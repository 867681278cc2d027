//! Error types for dictionary client operations.
//!
//! This module defines the main error type [`OrdbogError`] which represents
//! every failure a lookup, suggestion, login or cookie store operation can
//! report. "No matches" is never an error: an empty page yields an empty
//! [`LookupResult`](crate::LookupResult).
//!
//! # Example
//!
//! ```rust
//! use ordbog_core::{DictionaryCode, OrdbogError};
//!
//! match "zzzz".parse::<DictionaryCode>() {
//!     Ok(code) => println!("Using {}", code),
//!     Err(OrdbogError::InvalidDictionary(code)) => println!("Unknown dictionary '{}'", code),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dictionary client operations.
#[derive(Error, Debug)]
pub enum OrdbogError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other transport-level problems.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided or produced while composing a request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The requested dictionary code is not one the service knows.
    ///
    /// Always raised before any request is sent.
    #[error("Invalid dictionary '{0}'")]
    InvalidDictionary(String),

    /// The service answered with something that cannot be interpreted.
    ///
    /// Returned for result pages with word blocks that no language heading
    /// precedes, and for login responses without a `result` object.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// JSON decoding or encoding errors.
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Reading or writing the persisted cookie store failed.
    #[error("Cookie store error at {path}: {source}")]
    CookieStoreError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OrdbogError {
    /// Whether the error came from the transport rather than from the service's answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, OrdbogError::HttpError(_) | OrdbogError::Timeout { .. })
    }
}

/// Result type alias for OrdbogError.
///
/// This is a convenience alias for `std::result::Result<T, OrdbogError>`.
pub type Result<T> = std::result::Result<T, OrdbogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrdbogError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_invalid_dictionary_error() {
        let err = OrdbogError::InvalidDictionary("zzzz".to_string());
        assert_eq!(err.to_string(), "Invalid dictionary 'zzzz'");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_timeout_error() {
        let err = OrdbogError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert!(err.is_transport());
    }

    #[test]
    fn test_cookie_store_error_names_path() {
        let err = OrdbogError::CookieStoreError {
            path: PathBuf::from("/tmp/cookies.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/cookies.json"));
    }
}
