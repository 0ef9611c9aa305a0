//! Error types for suraksha.
//!
//! This module defines all error types used throughout the suraksha crate,
//! along with the short notices shown to the person filing a report.

use std::path::PathBuf;
use thiserror::Error;

/// Notice shown when a report could not be persisted.
pub const SUBMISSION_FAILED_NOTICE: &str = "Submission failed";

/// Notice shown when a report is submitted without a known location.
pub const LOCATION_UNAVAILABLE_NOTICE: &str = "Location not available";

/// Notice shown when the SOS flow is denied location access.
pub const LOCATION_REQUIRED_NOTICE: &str = "Please enable location to send SOS";

/// The main error type for suraksha operations.
#[derive(Error, Debug)]
pub enum Error {
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

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A key-value backend failed outside of `SQLite` itself.
    #[error("storage error: {0}")]
    Storage(String),

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

    // === Location Errors ===
    /// The user refused location access.
    #[error("location permission denied")]
    LocationPermissionDenied,

    /// No position fix could be obtained.
    #[error("location unavailable: {reason}")]
    LocationUnavailable {
        /// Why no position was available.
        reason: String,
    },

    // === Draft Errors ===
    /// Tried to attach more photos than a report can hold.
    #[error("a report can hold at most {max} photos")]
    PhotoLimitExceeded {
        /// The photo limit.
        max: usize,
    },

    /// The report draft is incomplete or malformed.
    #[error("invalid report: {message}")]
    InvalidDraft {
        /// Description of the problem.
        message: String,
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

/// A specialized Result type for suraksha operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new storage backend error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a location-unavailable error.
    #[must_use]
    pub fn location_unavailable(reason: impl Into<String>) -> Self {
        Self::LocationUnavailable {
            reason: reason.into(),
        }
    }

    /// Create an invalid-draft error.
    #[must_use]
    pub fn invalid_draft(message: impl Into<String>) -> Self {
        Self::InvalidDraft {
            message: message.into(),
        }
    }

    /// Check if this error is a location problem (denied or unavailable).
    #[must_use]
    pub fn is_location_error(&self) -> bool {
        matches!(
            self,
            Self::LocationPermissionDenied | Self::LocationUnavailable { .. }
        )
    }

    /// Check if this error came from the persistence layer.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
                | Self::Storage(_)
                | Self::Io(_)
                | Self::DirectoryCreate { .. }
                | Self::Json(_)
        )
    }

    /// Check if trying the same action again might succeed.
    ///
    /// Storage and location failures are retryable; a rejected draft or a
    /// broken configuration has to be fixed first.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_storage_error() || self.is_location_error()
    }

    /// The short notice shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::LocationPermissionDenied => LOCATION_REQUIRED_NOTICE.to_string(),
            Self::LocationUnavailable { .. } => LOCATION_UNAVAILABLE_NOTICE.to_string(),
            Self::PhotoLimitExceeded { .. }
            | Self::InvalidDraft { .. }
            | Self::ConfigLoad(_)
            | Self::ConfigValidation { .. } => self.to_string(),
            _ => SUBMISSION_FAILED_NOTICE.to_string(),
        }
    }
}
