//! Result and error types for the media-query mock.

use thiserror::Error;

/// Result type for media mock operations
pub type MediaMockResult<T> = Result<T, MediaMockError>;

/// Errors that can occur while driving the media-query mock
#[derive(Debug, Error)]
pub enum MediaMockError {
    /// Installation attempted outside a DOM-emulation host
    #[error("matchMedia mock requires a DOM emulation environment")]
    WrongEnvironment,

    /// The window entry point is already overridden by a mock
    #[error("matchMedia mock is already installed; call cleanup() first")]
    AlreadyInstalled,

    /// The window has no query-matching entry point
    #[error("window.matchMedia is not available")]
    MatchMediaUnavailable,

    /// Invalid viewport configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Lifecycle hook failed
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl MediaMockError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MediaMockError::WrongEnvironment.to_string(),
            "matchMedia mock requires a DOM emulation environment"
        );
        assert_eq!(
            MediaMockError::config("bad width").to_string(),
            "Configuration error: bad width"
        );
        assert_eq!(
            MediaMockError::fixture("setup failed").to_string(),
            "Fixture error: setup failed"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MediaMockError = io.into();
        assert!(matches!(err, MediaMockError::Io(_)));
    }
}
