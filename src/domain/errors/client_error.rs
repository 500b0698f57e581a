//! API client error types.

use thiserror::Error;

/// API client error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ClientError {
    #[error("invalid request url `{input}`: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header: {message}")]
    InvalidHeader { message: String },

    #[error("failed to encode request body: {message}")]
    Encoding { message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("unexpected client error: {message}")]
    Unexpected { message: String },
}

impl ClientError {
    /// Creates invalid url error.
    #[must_use]
    pub fn invalid_url(input: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            source,
        }
    }

    /// Creates invalid header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Creates encoding error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether error came from the network transport.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
