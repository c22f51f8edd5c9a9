use std::io::Read;

use async_trait::async_trait;
use clap::{Arg, ArgMatches};

use crate::cli::CliError;
use crate::commands::{Command, Context};
use crate::documents::parse_document;
use crate::output::write_json;

/// `escli ingest`: index a single JSON document.
pub struct IngestCommand;

#[async_trait]
impl Command for IngestCommand {
    fn name(&self) -> &'static str {
        "ingest"
    }

    fn description(&self) -> &'static str {
        "Index a single JSON document"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command
            .arg(
                Arg::new("index")
                    .value_name("INDEX")
                    .required(true)
                    .help("Name of the index to write to"),
            )
            .arg(
                Arg::new("document")
                    .value_name("DOCUMENT")
                    .required(true)
                    .allow_hyphen_values(true)
                    .help("Document as a JSON object, or - to read it from stdin"),
            )
    }

    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let (Some(index), Some(source)) = (
            matches.get_one::<String>("index"),
            matches.get_one::<String>("document"),
        ) else {
            return Err(CliError::usage("Both INDEX and DOCUMENT are required"));
        };

        let text = if source == "-" {
            let mut buf = String::new();
            ctx.stdin.read_to_string(&mut buf)?;
            buf
        } else {
            source.clone()
        };
        let document = parse_document(&text)?;

        let response = ctx.client.ingest(index, &document).await?;
        write_json(ctx.stdout, &response)?;
        Ok(())
    }
}
