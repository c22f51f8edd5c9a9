use async_trait::async_trait;
use clap::ArgMatches;

use crate::cli::CliError;
use crate::commands::{Command, Context};
use crate::output::write_json;

/// `escli info`
pub struct InfoCommand;

#[async_trait]
impl Command for InfoCommand {
    fn name(&self) -> &'static str {
        "info"
    }

    fn description(&self) -> &'static str {
        "Display backend system information"
    }

    async fn execute(&self, ctx: &mut Context<'_>, _matches: &ArgMatches) -> Result<(), CliError> {
        let info = ctx.client.info().await?;
        write_json(ctx.stdout, &info)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, Failure, MockClient};
    use serde_json::json;

    #[tokio::test]
    async fn test_info_prints_indented_json() {
        let client = MockClient::new().with_info(json!({
            "name": "node-1",
            "version": { "number": "8.15.0" }
        }));

        let output = run(&client, &["info"]).await.unwrap();

        assert_eq!(
            output,
            "{\n  \"name\": \"node-1\",\n  \"version\": {\n    \"number\": \"8.15.0\"\n  }\n}\n"
        );
    }

    #[tokio::test]
    async fn test_info_passes_client_error_through() {
        let client = MockClient::new().failing(Failure::Auth);

        let err = run(&client, &["info"]).await.unwrap_err();

        assert!(err.to_string().starts_with("Auth error: "));
        assert_eq!(err.exit_code(), 77);
    }
}
