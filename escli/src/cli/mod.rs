//! Command line plumbing shared by every command.

mod args;
mod error;

pub use args::{verbose_arg, ConnectionArgs};
pub use error::{exit_code, CliError};
