//! Result and error types for Ensayo.

use thiserror::Error;

/// Result type for harness operations
pub type EnsayoResult<T> = Result<T, EnsayoError>;

/// Errors that can occur while driving the browser or building fixtures
#[derive(Debug, Error)]
pub enum EnsayoError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page creation or transport error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched a selector
    #[error("No element matched selector {selector:?}")]
    ElementNotFound {
        /// The selector that matched nothing
        selector: String,
    },

    /// Wait timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was being awaited
        waited_for: String,
    },

    /// JavaScript evaluation error
    #[error("Evaluation failed: {message}")]
    Eval {
        /// Error message
        message: String,
    },

    /// Input dispatch error
    #[error("Input dispatch failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Cookie injection error
    #[error("Cookie injection failed: {message}")]
    Cookie {
        /// Error message
        message: String,
    },

    /// Session encoding or signing error
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_the_wait() {
        let err = EnsayoError::Timeout {
            ms: 5000,
            waited_for: "selector \"a.btn\"".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("5000ms"));
        assert!(text.contains("a.btn"));
    }

    #[test]
    fn test_element_not_found_carries_selector() {
        let err = EnsayoError::ElementNotFound {
            selector: "form label".to_string(),
        };
        assert!(err.to_string().contains("form label"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("not json");
        let err: EnsayoError = parse.unwrap_err().into();
        assert!(matches!(err, EnsayoError::Json(_)));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EnsayoError = io.into();
        assert!(matches!(err, EnsayoError::Io(_)));
    }
}
