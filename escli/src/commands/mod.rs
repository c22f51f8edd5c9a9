//! Command registry and dispatch.
//!
//! Each command is a type implementing [`Command`]: it names itself, carries
//! a static description, adds its arguments to a `clap::Command`, and runs
//! against a [`Context`] holding the search client and the output streams.
//! The [`CommandRegistry`] assembles the parser from the registered commands
//! and dispatches the parsed subcommand to its handler.

mod indexes;
mod info;
mod ingest;
mod load;
mod ping;
mod search;

#[cfg(test)]
pub(crate) mod testing;

use std::io::{Read, Write};

use async_trait::async_trait;
use clap::{ArgMatches, Args};
use escli_repository::SearchClient;

use crate::cli::{verbose_arg, CliError, ConnectionArgs};

pub use indexes::{CreateIndexCommand, DeleteIndexCommand, ListIndexesCommand};
pub use info::InfoCommand;
pub use ingest::IngestCommand;
pub use load::LoadCommand;
pub use ping::PingCommand;
pub use search::SearchCommand;

/// Everything a command needs to run.
pub struct Context<'a> {
    pub client: &'a dyn SearchClient,
    pub stdout: &'a mut (dyn Write + Send),
    pub stdin: &'a mut (dyn Read + Send),
}

/// A CLI subcommand.
#[async_trait]
pub trait Command: Send + Sync {
    /// The subcommand name, e.g. `ls`.
    fn name(&self) -> &'static str;

    /// One-line description shown in help.
    fn description(&self) -> &'static str;

    /// Add this command's arguments.
    fn configure(&self, command: clap::Command) -> clap::Command {
        command
    }

    /// Run the command with its parsed arguments.
    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError>;
}

/// The set of commands known to the CLI.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in command.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(InfoCommand)
            .register(PingCommand)
            .register(ListIndexesCommand)
            .register(CreateIndexCommand)
            .register(DeleteIndexCommand)
            .register(IngestCommand)
            .register(LoadCommand)
            .register(SearchCommand);
        registry
    }

    /// Add a command. A later command with the same name replaces the earlier one.
    pub fn register(&mut self, command: impl Command + 'static) -> &mut Self {
        self.commands.retain(|existing| existing.name() != command.name());
        self.commands.push(Box::new(command));
        self
    }

    /// Look up a command by name.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|command| command.name() == name)
            .map(|command| command.as_ref())
    }

    /// Names of the registered commands, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|command| command.name()).collect()
    }

    /// Build the top-level parser.
    pub fn parser(&self) -> clap::Command {
        let root = clap::Command::new("escli")
            .about("Command-line client for Elasticsearch and OpenSearch")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(verbose_arg());
        let root = ConnectionArgs::augment_args(root);

        self.commands.iter().fold(root, |root, command| {
            let sub = clap::Command::new(command.name()).about(command.description());
            root.subcommand(command.configure(sub))
        })
    }

    /// Run the subcommand selected in `matches`.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| CliError::usage("No command given"))?;
        let command = self
            .get(name)
            .ok_or_else(|| CliError::usage(format!("Unknown command '{}'", name)))?;

        tracing::debug!(command = name, "Dispatching command");
        command.execute(ctx, sub_matches).await
    }
}
