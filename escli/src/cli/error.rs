//! Command layer errors and their process exit codes.

use std::io;
use std::path::PathBuf;

use escli_repository::{ClientError, ConfigError};
use thiserror::Error;

/// Exit codes, following the BSD `sysexits.h` conventions.
pub mod exit_code {
    pub const USAGE: u8 = 64;
    pub const DATA_ERR: u8 = 65;
    pub const NO_INPUT: u8 = 66;
    pub const UNAVAILABLE: u8 = 69;
    pub const SOFTWARE: u8 = 70;
    pub const IO_ERR: u8 = 74;
    pub const NO_PERM: u8 = 77;
    pub const CONFIG: u8 = 78;
}

/// Errors that end a command invocation.
#[derive(Error, Debug)]
pub enum CliError {
    /// Connection settings could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A normalized client error, passed through unmodified.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The command line was malformed.
    #[error("{0}")]
    Usage(String),

    /// Input data could not be parsed.
    #[error("{0}")]
    Input(String),

    /// An input file could not be opened.
    #[error("Cannot open {path}: {source}")]
    NoInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Create a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create an input data error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a missing input error.
    pub fn no_input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::NoInput {
            path: path.into(),
            source,
        }
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::Client(ClientError::Connection { .. }) => exit_code::UNAVAILABLE,
            Self::Client(ClientError::Auth { .. }) => exit_code::NO_PERM,
            Self::Client(ClientError::Api { .. }) => exit_code::SOFTWARE,
            Self::Usage(_) => exit_code::USAGE,
            Self::Input(_) => exit_code::DATA_ERR,
            Self::NoInput { .. } => exit_code::NO_INPUT,
            Self::Io(_) => exit_code::IO_ERR,
        }
    }
}
