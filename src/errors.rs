//! Shared error types for the application
//!
//! Only run-aborting conditions live here. Soft resolution gaps and
//! classification failures are ordinary data (`Option`s and
//! [`ValidatorResult`](crate::validation::ValidatorResult)s) and never
//! surface as an [`Error`].

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Location;

/// Main error type for metaclassify operations
#[derive(Debug, Error)]
pub enum Error {
    /// The frontend reported a diagnostic of fatal severity
    #[error("Fatal parse error at {location}: {message}")]
    FatalDiagnostic { location: Location, message: String },

    /// A member or method carried an access specifier other than
    /// public/protected/private
    #[error("Invalid access specifier encountered on '{name}' at {location}")]
    InvalidAccessSpecifier { name: String, location: Location },

    /// The serialized translation unit references ids it does not contain
    #[error("Malformed AST: {0}")]
    MalformedAst(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a malformed-AST error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedAst(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error came from the frontend or from an internal
    /// extraction invariant, as opposed to the environment.
    pub fn is_fatal_analysis_error(&self) -> bool {
        matches!(
            self,
            Self::FatalDiagnostic { .. } | Self::InvalidAccessSpecifier { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_diagnostic_message_includes_location() {
        let err = Error::FatalDiagnostic {
            location: Location::new("include/app/Point.h", 3, 14),
            message: "'missing.h' file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fatal parse error at include/app/Point.h:3:14: 'missing.h' file not found"
        );
        assert!(err.is_fatal_analysis_error());
    }

    #[test]
    fn test_configuration_error_is_not_fatal_analysis_error() {
        let err = Error::configuration("bad tag");
        assert_eq!(err.to_string(), "Configuration error: bad tag");
        assert!(!err.is_fatal_analysis_error());
    }
}
