//! Error type shared by the library and its stores

use thiserror::Error;

/// Errors raised by the catalog and by storage backends
#[derive(Error, Debug)]
pub enum AppError {
    /// A store read or write failed
    #[error("Storage error: {message}")]
    StorageError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store is briefly unavailable (locked, busy)
    #[error("Storage unavailable: {operation}")]
    StorageUnavailable { operation: String },

    #[error("Book not found: {book_id}")]
    BookNotFound { book_id: String },

    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// True when the same call may succeed later without any change
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Wraps a backend error as a storage failure
    pub fn storage<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::StorageError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
