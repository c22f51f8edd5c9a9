//! Index management commands: `ls`, `mk` and `rm`.

use std::io::Write;

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches};
use escli_repository::{FieldMapping, IndexAcknowledgement, IndexFilter, IndexState};
use serde_json::Value;

use crate::cli::CliError;
use crate::commands::{Command, Context};
use crate::output::{cell, write_json, Table};

fn index_arg(help: &'static str) -> Arg {
    Arg::new("index").value_name("INDEX").required(true).help(help)
}

fn required_str<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str, CliError> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| CliError::usage(format!("Missing argument <{}>", id.to_uppercase())))
}

fn acknowledged(ack: &IndexAcknowledgement) -> &'static str {
    if ack.acknowledged {
        "acknowledged"
    } else {
        "not acknowledged"
    }
}

/// `escli ls`
pub struct ListIndexesCommand;

impl ListIndexesCommand {
    fn filter(matches: &ArgMatches) -> IndexFilter {
        let mut filter = IndexFilter::new()
            .with_hidden(matches.get_flag("all"))
            .with_state(IndexState::from_flags(
                matches.get_flag("open"),
                matches.get_flag("closed"),
            ));
        if let Some(pattern) = matches.get_one::<String>("index") {
            filter = filter.with_pattern(pattern.as_str());
        }
        filter
    }

    /// Build the listing table from index definitions keyed by name.
    fn table(indexes: &serde_json::Map<String, Value>) -> Table {
        let mut table = Table::new(["name", "uuid", "shards", "replicas", "aliases"]);
        for (name, definition) in indexes {
            let settings = &definition["settings"]["index"];
            let aliases = definition["aliases"]
                .as_object()
                .map(|aliases| aliases.keys().cloned().collect::<Vec<_>>().join(","))
                .unwrap_or_default();
            table.push_row(vec![
                name.clone(),
                cell(&settings["uuid"]),
                cell(&settings["number_of_shards"]),
                cell(&settings["number_of_replicas"]),
                aliases,
            ]);
        }
        table
    }
}

#[async_trait]
impl Command for ListIndexesCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn description(&self) -> &'static str {
        "List available indexes"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command
            .arg(
                Arg::new("index")
                    .value_name("INDEX")
                    .help("Index name or pattern to list"),
            )
            .arg(
                Arg::new("all")
                    .short('a')
                    .long("all")
                    .action(ArgAction::SetTrue)
                    .help("Include hidden and system indexes"),
            )
            .arg(
                Arg::new("open")
                    .short('o')
                    .long("open")
                    .action(ArgAction::SetTrue)
                    .help("Only list open indexes"),
            )
            .arg(
                Arg::new("closed")
                    .short('c')
                    .long("closed")
                    .action(ArgAction::SetTrue)
                    .help("Only list closed indexes"),
            )
            .arg(
                Arg::new("format")
                    .long("format")
                    .value_parser(["table", "json"])
                    .default_value("table")
                    .help("Output format"),
            )
    }

    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let filter = Self::filter(matches);
        let indexes = ctx.client.get_indexes(&filter).await?;

        match matches.get_one::<String>("format").map(String::as_str) {
            Some("json") => write_json(ctx.stdout, &indexes)?,
            _ => {
                let table = Self::table(&indexes);
                if !table.is_empty() {
                    table.write(ctx.stdout)?;
                }
            }
        }
        Ok(())
    }
}

/// `escli mk`
pub struct CreateIndexCommand;

#[async_trait]
impl Command for CreateIndexCommand {
    fn name(&self) -> &'static str {
        "mk"
    }

    fn description(&self) -> &'static str {
        "Create an index"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command.arg(index_arg("Name of the index to create")).arg(
            Arg::new("mapping")
                .short('m')
                .long("mapping")
                .value_name("NAME:TYPE")
                .value_parser(|s: &str| s.parse::<FieldMapping>())
                .action(ArgAction::Append)
                .help("Field mapping, may be repeated"),
        )
    }

    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let index = required_str(matches, "index")?;
        let mappings: Vec<FieldMapping> = matches
            .get_many::<FieldMapping>("mapping")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let ack = ctx.client.create_index(index, &mappings).await?;
        writeln!(
            ctx.stdout,
            "Created index {} ({})",
            ack.index.as_deref().unwrap_or(index),
            acknowledged(&ack)
        )?;
        Ok(())
    }
}

/// `escli rm`
pub struct DeleteIndexCommand;

#[async_trait]
impl Command for DeleteIndexCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn description(&self) -> &'static str {
        "Delete an index"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command.arg(index_arg("Name of the index to delete"))
    }

    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let index = required_str(matches, "index")?;

        let ack = ctx.client.delete_index(index).await?;
        writeln!(ctx.stdout, "Deleted index {} ({})", index, acknowledged(&ack))?;
        Ok(())
    }
}
