//! Error types for libris.
//!
//! This module defines all error types used throughout the libris crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// The main error type for libris operations.
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

    // === Document Errors ===
    /// No document with the given id exists in the collection.
    #[error("document '{id}' not found in collection '{collection}'")]
    DocumentNotFound {
        /// Collection that was searched.
        collection: String,
        /// The missing document id.
        id: String,
    },

    /// A stored document is not a JSON object.
    #[error("document '{id}' is malformed: {message}")]
    MalformedDocument {
        /// Id of the offending document.
        id: String,
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

    // === Catalog Errors ===
    /// Form input was rejected before reaching the store.
    #[error("invalid book: {0}")]
    Validation(#[from] ValidationError),

    /// A book id was referenced that is not in the loaded catalog.
    #[error("no book with id '{0}' in the catalog")]
    UnknownBook(String),

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
    /// A blocking store task panicked or was cancelled.
    #[error("store task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for libris operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a document-not-found error.
    #[must_use]
    pub fn document_not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Create a malformed-document error.
    #[must_use]
    pub fn malformed_document(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a missing document or book.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. } | Self::UnknownBook(_))
    }

    /// Check if this error came from form validation.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
