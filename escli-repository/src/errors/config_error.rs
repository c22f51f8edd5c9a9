//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving connection settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The endpoint URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The URL scheme is not supported.
    #[error("Unsupported scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// Credentials were only partially supplied.
    #[error("Incomplete credentials: {0}")]
    IncompleteCredentials(String),

    /// The CA certificate file could not be read.
    #[error("Failed to read CA certificate {path}: {source}")]
    Certificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A start-local `.env` file exists but is unusable.
    #[error("Invalid start-local file {path}: {reason}")]
    StartLocal { path: PathBuf, reason: String },

    /// No configuration source was found.
    #[error(
        "No connection settings found: set ESCLI_URL (or ESCLI_HOST) or run from a start-local directory"
    )]
    Unresolved,
}

impl ConfigError {
    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an incomplete credentials error.
    pub fn incomplete_credentials(msg: impl Into<String>) -> Self {
        Self::IncompleteCredentials(msg.into())
    }

    /// Create a start-local error.
    pub fn start_local(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StartLocal {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
