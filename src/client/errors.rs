//! Error types for remote configuration reads.
//!
//! These errors describe why a read could not produce a payload. The one
//! variant that is not really a failure is [`QueryError::ObjectNotFound`]:
//! the remote system reports an existing-but-empty import node the same way
//! it reports a node that was never created, so callers treat it as an empty
//! membership list rather than an error.

use thiserror::Error;

/// Errors returned by a [`ConfigClient`](crate::client::ConfigClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The addressed node does not exist or holds nothing.
    #[error("Object not found at {xpath}")]
    ObjectNotFound {
        /// XPath that was queried
        xpath: String,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("Transport error talking to {endpoint}: {message}")]
    Transport {
        /// Endpoint the request was sent to
        endpoint: String,
        /// Description of the transport failure
        message: String,
    },

    /// The API answered with a non-success HTTP status.
    #[error("HTTP status {status} from {endpoint}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Endpoint the request was sent to
        endpoint: String,
    },

    /// The API answered with an error envelope other than "not found".
    #[error("API error{}: {message}", .code.map(|c| format!(" (code {})", c)).unwrap_or_default())]
    Api {
        /// Error code from the response envelope, when present
        code: Option<u32>,
        /// Error text from the response envelope
        message: String,
    },

    /// The response could not be interpreted as an API envelope.
    #[error("Invalid API response: {message}")]
    InvalidResponse {
        /// Description of what was wrong with the response
        message: String,
    },

    /// The client is not configured well enough to issue requests.
    #[error("Client configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem
        message: String,
    },
}

impl QueryError {
    /// Create a not-found error for the given XPath
    pub fn not_found(xpath: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            xpath: xpath.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Whether this is the "no members" signal rather than a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }
}

/// Result type for remote configuration reads.
pub type QueryResult<T> = Result<T, QueryError>;
