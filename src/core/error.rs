//! Error types and error handling for the hugo-search service.
//!
//! This module defines the error types used throughout the
//! application. The HTTP status mapping lives in the `http`
//! adapter.

use thiserror::Error;

/// Result type alias for hugo-search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Main error type for the hugo-search service
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Front matter error in {path}: {message}")]
    FrontMatter { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl SearchError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SearchError::IndexNotFound(_) | SearchError::DocumentNotFound(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidQuery(_) | SearchError::InvalidField { .. }
        )
    }

    /// Shorthand for an invalid field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        SearchError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}
