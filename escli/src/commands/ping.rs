use std::io::Write;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use clap::{value_parser, Arg, ArgMatches};

use crate::cli::CliError;
use crate::commands::{Command, Context};

/// `escli ping`: repeated `HEAD /` requests, like `ping(8)`.
///
/// Failed attempts are reported inline and do not stop the loop.
pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn description(&self) -> &'static str {
        "Send HEAD requests to the service root to check availability"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command
            .arg(
                Arg::new("count")
                    .short('c')
                    .long("count")
                    .value_name("COUNT")
                    .value_parser(value_parser!(u64).range(1..))
                    .help("Stop after sending COUNT requests"),
            )
            .arg(
                Arg::new("interval")
                    .short('i')
                    .long("interval")
                    .value_name("SECS")
                    .value_parser(value_parser!(f64))
                    .default_value("1")
                    .help("Seconds to wait between requests"),
            )
    }

    async fn execute(&self, ctx: &mut Context<'_>, matches: &ArgMatches) -> Result<(), CliError> {
        let count = matches.get_one::<u64>("count").copied();
        let interval = matches.get_one::<f64>("interval").copied().unwrap_or(1.0);
        let interval = Duration::try_from_secs_f64(interval)
            .map_err(|_| CliError::usage(format!("Invalid interval: {}", interval)))?;

        writeln!(ctx.stdout, "HEAD {}", ctx.client.endpoint())?;

        let mut seq: u64 = 0;
        loop {
            seq += 1;
            let started = Instant::now();
            let result = ctx.client.ping().await;
            let elapsed = started.elapsed();

            match result {
                Ok(status) => writeln!(ctx.stdout, "{}: seq={} time={:?}", status, seq, elapsed)?,
                Err(e) => writeln!(ctx.stdout, "{}: seq={} time={:?}", e, seq, elapsed)?,
            }
            ctx.stdout.flush()?;

            if count.is_some_and(|count| seq >= count) {
                break;
            }
            tokio::time::sleep(interval).await;
        }

        Ok(())
    }
}
