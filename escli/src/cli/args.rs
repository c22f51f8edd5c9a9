//! Global command line arguments.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Args};
use escli_repository::ConnectionOptions;

/// Connection flags, each with an environment variable fallback.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[command(next_help_heading = "Connection")]
pub struct ConnectionArgs {
    /// Full backend URL, e.g. https://localhost:9200
    #[arg(long, env = "ESCLI_URL", global = true)]
    pub url: Option<String>,

    /// Backend host, used when no URL is given
    #[arg(long, env = "ESCLI_HOST", global = true)]
    pub host: Option<String>,

    /// Backend port [default: 9200]
    #[arg(long, env = "ESCLI_PORT", global = true)]
    pub port: Option<u16>,

    /// URL scheme [default: http]
    #[arg(long, env = "ESCLI_SCHEME", value_parser = ["http", "https"], global = true)]
    pub scheme: Option<String>,

    /// User for basic authentication [default: elastic]
    #[arg(long, env = "ESCLI_USER", global = true)]
    pub user: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "ESCLI_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Encoded API key, takes precedence over user and password
    #[arg(long, env = "ESCLI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// PEM encoded CA certificate for TLS validation
    #[arg(long, env = "ESCLI_CA_CERT", value_name = "FILE", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS certificate validation
    #[arg(long, env = "ESCLI_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ESCLI_TIMEOUT", value_name = "SECS", global = true)]
    pub timeout: Option<u64>,
}

impl From<ConnectionArgs> for ConnectionOptions {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            url: args.url,
            host: args.host,
            port: args.port,
            scheme: args.scheme,
            user: args.user,
            password: args.password,
            api_key: args.api_key,
            ca_cert: args.ca_cert,
            insecure: args.insecure,
            timeout_secs: args.timeout,
        }
    }
}

/// The repeatable `-v/--verbose` flag.
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
        .action(ArgAction::Count)
        .global(true)
}
