use std::error::Error;
use std::process::ExitCode;

use clap::error::ErrorKind;
use escli::cli::exit_code;
use escli::output::print_error;
use escli::{logging, CommandRegistry};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let registry = CommandRegistry::with_defaults();

    let matches = match registry.parser().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(exit_code::USAGE),
            };
        }
    };

    logging::init(matches.get_count("verbose"));

    match escli::run(&registry, &matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let mut source = e.source();
            while let Some(cause) = source {
                debug!("Caused by: {}", cause);
                source = cause.source();
            }
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}
