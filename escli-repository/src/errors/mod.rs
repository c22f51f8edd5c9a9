//! Error types for the escli repository.
//!
//! `ClientError` is the only error shape returned by `SearchClient`
//! operations. `ConfigError` covers connection settings that could not be
//! resolved before a client exists.

mod client_error;
mod config_error;

pub use client_error::{BoxError, ClientError};
pub use config_error::ConfigError;
