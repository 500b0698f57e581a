//! Durable storage error types.

use thiserror::Error;

/// Durable storage error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StorageError {
    #[error("failed to access durable storage: {message}")]
    AccessFailed { message: String },

    #[error("failed to read `{key}` from durable storage: {message}")]
    ReadFailed { key: String, message: String },

    #[error("failed to write `{key}` to durable storage: {message}")]
    WriteFailed { key: String, message: String },

    #[error("failed to remove `{key}` from durable storage: {message}")]
    RemoveFailed { key: String, message: String },

    #[error("durable storage not available: {message}")]
    NotAvailable { message: String },
}

impl StorageError {
    /// Creates access failed error.
    #[must_use]
    pub fn access(message: impl Into<String>) -> Self {
        Self::AccessFailed {
            message: message.into(),
        }
    }

    /// Creates read failed error.
    #[must_use]
    pub fn read(key: &str, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Creates write failed error.
    #[must_use]
    pub fn write(key: &str, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Creates remove failed error.
    #[must_use]
    pub fn remove(key: &str, message: impl Into<String>) -> Self {
        Self::RemoveFailed {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Creates not available error.
    #[must_use]
    pub fn not_available(message: impl Into<String>) -> Self {
        Self::NotAvailable {
            message: message.into(),
        }
    }
}
