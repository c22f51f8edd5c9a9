use async_trait::async_trait;
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use escli_repository::types::DEFAULT_PAGE_SIZE;
use escli_repository::SearchRequest;

use crate::cli::CliError;
use crate::commands::{Command, Context};
use crate::output::{write_json, Table};

/// `escli search`
pub struct SearchCommand;

impl SearchCommand {
    fn request(matches: &ArgMatches) -> Result<SearchRequest, CliError> {
        let index = matches
            .get_one::<String>("index")
            .ok_or_else(|| CliError::usage("Missing argument <INDEX>"))?;

        let mut request = SearchRequest::new(index.as_str()).with_page(
            matches
                .get_one::<u32>("page_size")
                .copied()
                .unwrap_or(DEFAULT_PAGE_SIZE),
            matches.get_one::<u32>("page").copied().unwrap_or(1),
        );

        if let Some(query) = matches.get_one::<String>("query") {
            request = request.with_query(query.as_str());
        }
        if let Some(sort) = matches.get_one::<String>("sort") {
            request = request.with_sort(sort);
            if request.sort.is_none() {
                return Err(CliError::usage(format!("Invalid sort field '{}'", sort)));
            }
        }
        if let Some(fields) = matches.get_many::<String>("field") {
            request = request.with_fields(fields.cloned().collect());
        }

        Ok(request)
    }
}

#[async_trait]
impl Command for SearchCommand {
    fn name(&self) -> &'static str {
        "search"
    }

    fn description(&self) -> &'static str {
        "Search an index"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command
            .arg(
                Arg::new("index")
                    .value_name("INDEX")
                    .required(true)
                    .help("Index, alias or pattern to search"),
            )
            .arg(
                Arg::new("query")
                    .value_name("QUERY")
                    .help("FIELD=VALUE match, or a Lucene query string; omit to match everything"),
            )
            .arg(
                Arg::new("sort")
                    .short('s')
                    .long("sort")
                    .value_name("FIELD")
                    .allow_hyphen_values(true)
                    .help("Sort by FIELD ascending, or ~FIELD descending"),
            )
            .arg(
                Arg::new("field")
                    .short('f')
                    .long("field")
                    .value_name("NAME")
                    .action(ArgAction::Append)
                    .help("Source field to return, may be repeated"),
            )
            .arg(
                Arg::new("page_size")
                    .short('n')
                    .long("page-size")
                    .value_name("N")
                    .value_parser(value_parser!(u32).range(1..))
                    .default_value("10")
                    .help("Hits per page"),
            )
            .arg(
                Arg::new("page")
                    .short('p')
                    .long("page")
                    .value_name("N")
                    .value_parser(value_parser!(u32).range(1..))
                    .default_value("1")
                    .help("Page number, starting at 1"),
            )
            .arg(
                Arg::new("format")
                    .long("format")
                    .value_parser(["json", "table"])
                    .default_value("json")
                    .help("Output format"),
            )
    }

    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let request = Self::request(matches)?;
        let hits = ctx.client.search(&request).await?;

        match matches.get_one::<String>("format").map(String::as_str) {
            Some("table") => {
                let table = Table::from_documents(&hits);
                if !table.is_empty() {
                    table.write(ctx.stdout)?;
                }
            }
            _ => write_json(ctx.stdout, &hits)?,
        }
        Ok(())
    }
}
