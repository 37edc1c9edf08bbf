use super::*;
use crate::format::ColorChoice;
use mockito::Server;

#[test]
fn test_challenge_output_from_bearer() {
    let challenge = AuthChallenge::parse(
        r#"Bearer realm="https://auth.docker.io/token",service="registry.docker.io""#,
    );
    let output = ChallengeOutput::new("https://registry-1.docker.io", &challenge);

    assert_eq!(output.scheme, "Bearer");
    assert_eq!(output.realm.as_deref(), Some("https://auth.docker.io/token"));
    assert_eq!(output.service.as_deref(), Some("registry.docker.io"));
}

#[test]
fn test_challenge_pretty_output_omits_missing_fields() {
    let ctx = AppContext::with_defaults(ColorChoice::Never);
    let output = ChallengeOutput::new("https://r.example", &AuthChallenge::Basic);

    let text = output.format_pretty(&ctx);
    assert_eq!(text, "Registry: https://r.example\nScheme:   Basic");
}

#[test]
fn test_challenge_json_output() {
    let ctx = AppContext::with_defaults(ColorChoice::Never);
    let output = ChallengeOutput::new("https://r.example", &AuthChallenge::Unknown);

    let json = format::format_output(&ctx, &output, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["scheme"], "Unknown");
    assert!(value.get("realm").is_none());
}

#[test]
fn test_run_challenge_against_registry() {
    let mut server = Server::new();
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", r#"Basic realm="Registry""#)
        .create();

    let ctx = AppContext::with_defaults(ColorChoice::Never);
    let url = server.url();
    let output = run_challenge(&ctx, Some(&url)).unwrap();

    assert_eq!(output.registry, url);
    assert_eq!(output.scheme, "Basic");
}

#[test]
fn test_run_challenge_unreachable_registry() {
    let ctx = AppContext::with_defaults(ColorChoice::Never);
    let err = run_challenge(&ctx, Some("http://127.0.0.1:9")).unwrap_err();
    assert!(err.contains("Network error"));
}
