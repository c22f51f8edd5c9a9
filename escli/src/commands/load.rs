use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use escli_repository::{BulkSummary, Document};
use tracing::{debug, info, instrument, warn};

use crate::cli::CliError;
use crate::commands::{Command, Context};
use crate::documents::{read_csv, read_ndjson};

/// Default number of documents per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// `escli load`: bulk-load documents from CSV and NDJSON files.
///
/// Every file is read before anything is sent, so a malformed file aborts
/// the load without writing a partial batch.
pub struct LoadCommand;

impl LoadCommand {
    fn read_all(matches: &ArgMatches) -> Result<Vec<Document>, CliError> {
        let csv_files = matches.get_many::<PathBuf>("csv").into_iter().flatten();
        let ndjson_files = matches.get_many::<PathBuf>("ndjson").into_iter().flatten();

        let mut documents = Vec::new();
        let mut files = 0;
        for path in csv_files {
            documents.extend(read_csv(path)?);
            files += 1;
        }
        for path in ndjson_files {
            documents.extend(read_ndjson(path)?);
            files += 1;
        }

        if files == 0 {
            return Err(CliError::usage(
                "No input files, use --from-csv or --from-ndjson",
            ));
        }
        Ok(documents)
    }

    #[instrument(skip(ctx, documents), fields(documents = documents.len()))]
    async fn send(
        ctx: &mut Context<'_>,
        index: &str,
        documents: &[Document],
        batch_size: usize,
    ) -> Result<BulkSummary, CliError> {
        let mut summary = BulkSummary::default();
        for (i, batch) in documents.chunks(batch_size).enumerate() {
            debug!(batch = i + 1, size = batch.len(), "Sending batch");
            summary.merge(ctx.client.bulk_ingest(index, batch).await?);
        }
        Ok(summary)
    }
}

#[async_trait]
impl Command for LoadCommand {
    fn name(&self) -> &'static str {
        "load"
    }

    fn description(&self) -> &'static str {
        "Bulk-load documents from files"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command
            .arg(
                Arg::new("index")
                    .value_name("INDEX")
                    .required(true)
                    .help("Name of the index to load into"),
            )
            .arg(
                Arg::new("csv")
                    .long("from-csv")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .action(ArgAction::Append)
                    .help("CSV file with a header row, may be repeated"),
            )
            .arg(
                Arg::new("ndjson")
                    .long("from-ndjson")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .action(ArgAction::Append)
                    .help("Newline-delimited JSON file, may be repeated"),
            )
            .arg(
                Arg::new("batch_size")
                    .long("batch-size")
                    .value_name("N")
                    .value_parser(value_parser!(u32).range(1..))
                    .help("Documents per bulk request [default: 1000]"),
            )
    }

    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let index = matches
            .get_one::<String>("index")
            .ok_or_else(|| CliError::usage("Missing argument <INDEX>"))?;
        let batch_size = matches
            .get_one::<u32>("batch_size")
            .map(|n| *n as usize)
            .unwrap_or(DEFAULT_BATCH_SIZE);

        let documents = Self::read_all(matches)?;
        info!(index = %index, documents = documents.len(), "Loading documents");

        let summary = Self::send(ctx, index, &documents, batch_size).await?;

        for (result, count) in &summary.results {
            writeln!(ctx.stdout, "Successfully {} {} documents", result, count)?;
        }
        if summary.failed > 0 {
            warn!(failed = summary.failed, "Some documents were rejected");
            writeln!(ctx.stdout, "Failed to load {} documents", summary.failed)?;
        }
        Ok(())
    }
}
