//! # escli
//!
//! A command-line client for Elasticsearch-compatible search backends.
//!
//! The binary parses a subcommand, resolves connection settings, builds an
//! `OpenSearchClient` and hands it to the selected command. Commands only see
//! the `SearchClient` trait, so they can be tested against an in-memory mock.

pub mod cli;
pub mod commands;
pub mod documents;
pub mod logging;
pub mod output;

use std::io;

use clap::{ArgMatches, FromArgMatches};
use escli_repository::config::default_start_local_dirs;
use escli_repository::{ConnectionConfig, ConnectionOptions, OpenSearchClient};
use tracing::debug;

pub use cli::{CliError, ConnectionArgs};
pub use commands::{Command, CommandRegistry, Context};

/// Resolve the connection, build the client and run the selected command.
pub async fn run(registry: &CommandRegistry, matches: &ArgMatches) -> Result<(), CliError> {
    let args = ConnectionArgs::from_arg_matches(matches)
        .map_err(|e| CliError::usage(e.to_string()))?;
    let options = ConnectionOptions::from(args);
    let config = ConnectionConfig::resolve(&options, &default_start_local_dirs())?;
    debug!(url = %config.url, credentials = ?config.credentials, "Resolved connection");

    let client = OpenSearchClient::new(&config)?;

    let mut stdout = io::stdout();
    let mut stdin = io::stdin();
    let mut ctx = Context {
        client: &client,
        stdout: &mut stdout,
        stdin: &mut stdin,
    };
    registry.dispatch(&mut ctx, matches).await
}
