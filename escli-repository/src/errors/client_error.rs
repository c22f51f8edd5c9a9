//! Client error types.
//!
//! This module defines the normalized errors returned across the client
//! boundary. Each variant keeps the backend failure it was built from as its
//! `source`, so callers can walk the cause chain for diagnostics.

use thiserror::Error;

/// A boxed backend failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during search client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend could not be reached.
    #[error("Connection error: {source}")]
    Connection {
        #[source]
        source: BoxError,
    },

    /// The backend rejected the supplied credentials.
    #[error("Auth error: {source}")]
    Auth {
        #[source]
        source: BoxError,
    },

    /// The backend reported any other failure (bad request, missing index,
    /// server error, undecodable response).
    #[error("API error: {source}")]
    Api {
        #[source]
        source: BoxError,
    },
}

impl ClientError {
    /// Create a connection error.
    pub fn connection(source: impl Into<BoxError>) -> Self {
        Self::Connection {
            source: source.into(),
        }
    }

    /// Create an authentication error.
    pub fn auth(source: impl Into<BoxError>) -> Self {
        Self::Auth {
            source: source.into(),
        }
    }

    /// Create an API error.
    pub fn api(source: impl Into<BoxError>) -> Self {
        Self::Api {
            source: source.into(),
        }
    }

    /// Check whether this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Check whether this is an authentication error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Check whether this is an API error.
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}
