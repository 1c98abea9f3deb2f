//! Error types for sportsz.
//!
//! Failures fall into two families. Validation errors describe bad user input
//! and are reported next to the offending form; everything else is an
//! environment failure (storage, configuration, platform capabilities).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sportsz operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// User input was missing or invalid. No state was changed.
    #[error("{message}")]
    Validation {
        /// Message shown to the user.
        message: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database was written with a layout this build cannot read.
    #[error("unsupported database layout: {message}")]
    DatabaseLayout {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Platform Errors ===
    /// The user declined a permission prompt.
    #[error("permission denied: {capability}")]
    PermissionDenied {
        /// The capability that was refused (e.g. "notifications").
        capability: String,
    },

    /// The platform does not offer a required capability.
    #[error("{capability} not supported on this platform")]
    Unsupported {
        /// The missing capability.
        capability: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for sportsz operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a permission denied error.
    #[must_use]
    pub fn permission_denied(capability: impl Into<String>) -> Self {
        Self::PermissionDenied {
            capability: capability.into(),
        }
    }

    /// Create an unsupported capability error.
    #[must_use]
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// Check if this error was caused by invalid user input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error was caused by the environment rather than input.
    #[must_use]
    pub fn is_environment(&self) -> bool {
        !self.is_validation()
    }

    /// Check if this error is a permission issue.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_is_bare_message() {
        let err = Error::validation("Please enter name, age and sport.");
        assert_eq!(err.to_string(), "Please enter name, age and sport.");
    }

    #[test]
    fn test_error_kinds() {
        let err = Error::validation("Video too short.");
        assert!(err.is_validation());
        assert!(!err.is_environment());

        let err = Error::internal("lock poisoned");
        assert!(!err.is_validation());
        assert!(err.is_environment());
    }

    #[test]
    fn test_permission_denied() {
        let err = Error::permission_denied("notifications");
        assert!(err.is_permission_error());
        assert!(err.is_environment());
        assert_eq!(err.to_string(), "permission denied: notifications");
    }

    #[test]
    fn test_unsupported_display() {
        let err = Error::unsupported("Notifications");
        assert_eq!(err.to_string(), "Notifications not supported on this platform");
        assert!(!err.is_permission_error());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_layout_error_display() {
        let err = Error::DatabaseLayout {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "chart_window must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("chart_window"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
