// End-to-end runs of the command layer against a mock backend.

use escli::{CliError, CommandRegistry};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run(args: &[&str]) -> Result<(), CliError> {
    let registry = CommandRegistry::with_defaults();
    let matches = registry
        .parser()
        .try_get_matches_from(std::iter::once("escli").chain(args.iter().copied()))
        .map_err(|e| CliError::usage(e.to_string()))?;
    escli::run(&registry, &matches).await
}

#[tokio::test]
async fn info_succeeds_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "node-1" })))
        .expect(1)
        .mount(&server)
        .await;

    run(&["--url", &server.uri(), "info"]).await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_exit_with_noperm() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "type": "security_exception", "reason": "unable to authenticate user [elastic]" },
            "status": 401
        })))
        .mount(&server)
        .await;

    let err = run(&["--url", &server.uri(), "--password", "wrong", "info"])
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Client(ref e) if e.is_auth()));
    assert_eq!(err.exit_code(), 77);
}

#[tokio::test]
async fn missing_index_exits_with_software_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "index_not_found_exception", "reason": "no such index [nope]" },
            "status": 404
        })))
        .mount(&server)
        .await;

    let err = run(&["--url", &server.uri(), "rm", "nope"]).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "API error: 404 index_not_found_exception: no such index [nope]"
    );
    assert_eq!(err.exit_code(), 70);
}

#[tokio::test]
async fn unreachable_backend_exits_unavailable() {
    let err = run(&["--url", "http://127.0.0.1:1", "--timeout", "2", "info"])
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Connection error: "));
    assert_eq!(err.exit_code(), 69);
}

#[tokio::test]
async fn user_without_password_is_a_config_error() {
    let err = run(&["--url", "http://localhost:9200", "--user", "admin", "info"])
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Config(_)));
    assert_eq!(err.exit_code(), 78);
}
