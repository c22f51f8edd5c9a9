//! Backend failure classification.
//!
//! Every call into the OpenSearch client runs through [`guarded`], which
//! classifies whatever went wrong as an [`OpenSearchFailure`], logs the
//! backend's diagnostic payload at debug level, and hands back the matching
//! [`ClientError`].

use std::fmt;
use std::future::Future;

use opensearch::http::response::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::errors::{BoxError, ClientError};

/// An error body returned by the backend for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// `error.type`, when the body is a structured error.
    pub error_type: Option<String>,
    /// `error.reason`, or the raw body when it is not a structured error.
    pub reason: String,
}

impl ErrorBody {
    /// Extract the error type and reason from a raw response body.
    ///
    /// Understands `{"error": {"type": .., "reason": ..}}` and
    /// `{"error": ".."}`; anything else is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(raw).ok();
        match parsed.as_ref().and_then(|v| v.get("error")) {
            Some(Value::Object(error)) => Self {
                error_type: error.get("type").and_then(Value::as_str).map(str::to_string),
                reason: error
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or(raw)
                    .to_string(),
            },
            Some(Value::String(reason)) => Self {
                error_type: None,
                reason: reason.clone(),
            },
            _ => Self {
                error_type: None,
                reason: if raw.trim().is_empty() {
                    "no response body".to_string()
                } else {
                    raw.trim().to_string()
                },
            },
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            Some(error_type) => write!(f, "{}: {}", error_type, self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// A failure raised by the OpenSearch client or reported by the backend.
#[derive(Error, Debug)]
pub enum OpenSearchFailure {
    /// No HTTP response was received, or the transport could not be built.
    #[error("{0}")]
    Transport(#[source] BoxError),

    /// The backend answered 401.
    #[error("{status} {body}")]
    Authentication { status: u16, body: ErrorBody },

    /// The backend answered any other non-2xx status.
    #[error("{status} {body}")]
    Api { status: u16, body: ErrorBody },

    /// A 2xx response whose body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[source] opensearch::Error),
}

impl OpenSearchFailure {
    /// Wrap a transport-level error.
    pub fn transport(source: impl Into<BoxError>) -> Self {
        Self::Transport(source.into())
    }

    /// Classify a non-2xx response by its status code.
    pub fn from_status(status: u16, raw_body: &str) -> Self {
        let body = ErrorBody::parse(raw_body);
        if status == 401 {
            Self::Authentication { status, body }
        } else {
            Self::Api { status, body }
        }
    }
}

impl From<opensearch::Error> for OpenSearchFailure {
    fn from(err: opensearch::Error) -> Self {
        Self::transport(err)
    }
}

/// Pass a 2xx response through, or turn any other status into a failure.
pub async fn check_status(response: Response) -> Result<Response, OpenSearchFailure> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let raw_body = body_or_empty(status.as_u16(), response.text().await);
    Err(OpenSearchFailure::from_status(status.as_u16(), &raw_body))
}

/// The body of an error response, or an empty string when it cannot be read.
fn body_or_empty(status: u16, read: Result<String, opensearch::Error>) -> String {
    read.unwrap_or_else(|err| {
        debug!(status, error = %err, "Failed to read error response body");
        String::new()
    })
}

/// Check the status of a response and decode its JSON body.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, OpenSearchFailure> {
    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(OpenSearchFailure::Decode)
}

/// Map a backend failure to the caller-facing error, logging its details.
pub fn translate(operation: &str, failure: OpenSearchFailure) -> ClientError {
    match &failure {
        OpenSearchFailure::Transport(source) => {
            debug!(operation, error = %source, "Backend unreachable");
            ClientError::connection(failure)
        }
        OpenSearchFailure::Authentication { status, body } => {
            debug!(
                operation,
                status,
                error_type = body.error_type.as_deref().unwrap_or("none"),
                reason = %body.reason,
                "Backend rejected credentials"
            );
            ClientError::auth(failure)
        }
        OpenSearchFailure::Api { status, body } => {
            debug!(
                operation,
                status,
                error_type = body.error_type.as_deref().unwrap_or("none"),
                reason = %body.reason,
                "Backend request failed"
            );
            ClientError::api(failure)
        }
        OpenSearchFailure::Decode(source) => {
            debug!(operation, error = %source, "Backend response could not be decoded");
            ClientError::api(failure)
        }
    }
}

/// Run one unit of backend work, translating any failure.
pub async fn guarded<T, F>(operation: &str, work: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, OpenSearchFailure>>,
{
    work.await.map_err(|failure| translate(operation, failure))
}
