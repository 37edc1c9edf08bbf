use super::*;
use mockito::{Matcher, Server};

fn bearer_header(server: &Server) -> String {
    format!(
        r#"Bearer realm="{}/token",service="registry.example""#,
        server.url()
    )
}

#[test]
fn test_tag_query_defaults() {
    let query = TagQuery::new("lib/app", "https://registry.example");
    assert_eq!(query.filter_pattern, "");
    assert!(!query.reverse_order);
    assert_eq!(query.order(), TagOrder::Descending);
}

#[test]
fn test_tag_query_with_order() {
    let query = TagQuery::new("app", "").with_order(TagOrder::Ascending);
    assert!(query.reverse_order);
    assert_eq!(query.order(), TagOrder::Ascending);
}

#[test]
fn test_tag_result_states() {
    assert!(!TagResult::default().is_error());
    assert!(!TagResult::with_tags(vec!["1.0".to_string()]).is_error());
    assert!(TagResult::failed("boom").is_error());

    let blank = TagResult {
        tags: Vec::new(),
        error_message: Some(String::new()),
    };
    assert!(!blank.is_error());
}

#[test]
fn test_tag_result_serialization_skips_missing_error() {
    let json = serde_json::to_string(&TagResult::with_tags(vec!["1.0".to_string()])).unwrap();
    assert_eq!(json, r#"{"tags":["1.0"]}"#);
}

#[test]
fn test_tag_lister_default_registry() {
    assert_eq!(
        TagLister::default().default_registry(),
        "https://registry-1.docker.io"
    );

    let config = Config::from_yaml_str("registry:\n  default_url: https://ghcr.io").unwrap();
    assert_eq!(
        TagLister::from_config(&config).default_registry(),
        "https://ghcr.io"
    );
}

#[test]
fn test_list_tags_bearer_filters_and_orders() {
    let mut server = Server::new();
    let header = bearer_header(&server);
    let probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", &header)
        .create();
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("service".into(), "registry.example".into()),
            Matcher::UrlEncoded("scope".into(), "repository:lib/app:pull".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"token":"abc"}"#)
        .create();
    let tags = server
        .mock("GET", "/v2/lib/app/tags/list")
        .match_header("authorization", "Bearer abc")
        .with_status(200)
        .with_body(r#"{"tags":["1.2.0","1.10.0","latest"]}"#)
        .create();

    let query = TagQuery::new("lib/app", server.url()).with_filter(r"\d+\.\d+\.\d+");
    let result = list_tags(&query, &Credentials::anonymous()).unwrap();

    probe.assert();
    token.assert();
    tags.assert();
    assert_eq!(result.tags, vec!["1.10.0", "1.2.0"]);
    assert!(result.error_message.is_none());
}

#[test]
fn test_list_tags_bearer_reverse_order() {
    let mut server = Server::new();
    let header = bearer_header(&server);
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", &header)
        .create();
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"access_token":"xyz"}"#)
        .create();
    let _tags = server
        .mock("GET", "/v2/app/tags/list")
        .match_header("authorization", "Bearer xyz")
        .with_status(200)
        .with_body(r#"{"tags":["1.2.0","1.10.0","0.9"]}"#)
        .create();

    let query = TagQuery::new("app", server.url()).with_reverse_order(true);
    let result = list_tags(&query, &Credentials::anonymous()).unwrap();

    assert_eq!(result.tags, vec!["0.9", "1.2.0", "1.10.0"]);
}

#[test]
fn test_list_tags_bearer_exchange_uses_complete_credentials() {
    let mut server = Server::new();
    let header = bearer_header(&server);
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", &header)
        .create();
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .with_body(r#"{"token":"t"}"#)
        .create();
    let _tags = server
        .mock("GET", "/v2/app/tags/list")
        .with_status(200)
        .with_body(r#"{"tags":["1.0"]}"#)
        .create();

    let query = TagQuery::new("app", server.url());
    let result = list_tags(&query, &Credentials::basic("user", "pass")).unwrap();

    token.assert();
    assert_eq!(result.tags, vec!["1.0"]);
}

#[test]
fn test_list_tags_basic_sends_encoded_credentials() {
    let mut server = Server::new();
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", r#"Basic realm="x""#)
        .create();
    let tags = server
        .mock("GET", "/v2/app/tags/list")
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .with_body(r#"{"tags":["2.0","10.1","latest"]}"#)
        .create();

    let query = TagQuery::new("app", server.url());
    let result = list_tags(&query, &Credentials::basic("user", "pass")).unwrap();

    tags.assert();
    assert_eq!(result.tags, vec!["10.1", "2.0", "latest"]);
}

#[test]
fn test_list_tags_basic_with_anonymous_credentials() {
    let mut server = Server::new();
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", "Basic")
        .create();
    let tags = server
        .mock("GET", "/v2/app/tags/list")
        .match_header("authorization", "Basic Og==")
        .with_status(200)
        .with_body(r#"{"tags":[]}"#)
        .create();

    let result = list_tags(&TagQuery::new("app", server.url()), &Credentials::anonymous()).unwrap();

    tags.assert();
    assert!(result.tags.is_empty());
    assert!(!result.is_error());
}

#[test]
fn test_list_tags_fetch_unauthorized_reports_error() {
    let mut server = Server::new();
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", r#"Basic realm="x""#)
        .create();
    let _tags = server
        .mock("GET", "/v2/app/tags/list")
        .with_status(401)
        .create();

    let result = list_tags(&TagQuery::new("app", server.url()), &Credentials::anonymous()).unwrap();

    assert!(result.tags.is_empty());
    assert!(result.is_error());
    assert!(result.error_message.unwrap().contains("401 Unauthorized"));
}

#[test]
fn test_list_tags_unknown_scheme_is_silent() {
    let mut server = Server::new();
    let _probe = server.mock("GET", "/v2/").with_status(200).create();
    let tags = server
        .mock("GET", "/v2/app/tags/list")
        .expect(0)
        .create();

    let result = list_tags(&TagQuery::new("app", server.url()), &Credentials::anonymous()).unwrap();

    tags.assert();
    assert_eq!(result, TagResult::default());
}

#[test]
fn test_list_tags_bearer_without_service_is_silent() {
    let mut server = Server::new();
    let header = format!(r#"Bearer realm="{}/token""#, server.url());
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", &header)
        .create();
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let result = list_tags(&TagQuery::new("app", server.url()), &Credentials::anonymous()).unwrap();

    token.assert();
    assert!(result.tags.is_empty());
    assert!(result.error_message.is_none());
}

#[test]
fn test_list_tags_token_exchange_failure_stops_before_fetch() {
    let mut server = Server::new();
    let header = bearer_header(&server);
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", &header)
        .create();
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(403)
        .create();
    let tags = server
        .mock("GET", "/v2/app/tags/list")
        .expect(0)
        .create();

    let result = list_tags(&TagQuery::new("app", server.url()), &Credentials::anonymous()).unwrap();

    token.assert();
    tags.assert();
    assert!(result.tags.is_empty());
    assert!(result.error_message.unwrap().contains("403"));
}

#[test]
fn test_list_tags_missing_token_key_reports_error() {
    let mut server = Server::new();
    let header = bearer_header(&server);
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", &header)
        .create();
    let _token = server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"expires_in":60}"#)
        .create();
    let tags = server
        .mock("GET", "/v2/app/tags/list")
        .expect(0)
        .create();

    let result = list_tags(&TagQuery::new("app", server.url()), &Credentials::anonymous()).unwrap();

    tags.assert();
    assert!(
        result
            .error_message
            .unwrap()
            .contains("token was not received")
    );
}

#[test]
fn test_list_tags_each_request_is_sent_once() {
    let mut server = Server::new();
    let probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", "Basic")
        .expect(1)
        .create();
    let tags = server
        .mock("GET", "/v2/app/tags/list")
        .with_status(503)
        .expect(1)
        .create();

    let result = list_tags(&TagQuery::new("app", server.url()), &Credentials::anonymous()).unwrap();

    probe.assert();
    tags.assert();
    assert!(result.error_message.unwrap().contains("503"));
}

#[test]
fn test_list_tags_malformed_filter_fails_before_io() {
    let mut server = Server::new();
    let probe = server.mock("GET", "/v2/").expect(0).create();

    let query = TagQuery::new("app", server.url()).with_filter("([");
    let err = list_tags(&query, &Credentials::anonymous()).unwrap_err();

    probe.assert();
    assert!(matches!(err, ImageTagError::MalformedFilterPattern { .. }));
}

#[test]
fn test_list_tags_unreachable_registry_reports_error() {
    let lister = TagLister::new(ClientConfig::new().with_timeout(2));
    let query = TagQuery::new("app", "http://127.0.0.1:9");

    let result = lister.list_tags(&query, &Credentials::anonymous()).unwrap();

    assert!(result.tags.is_empty());
    assert!(result.error_message.unwrap().contains("Network error"));
}

#[test]
fn test_list_tags_blank_registry_uses_default() {
    let mut server = Server::new();
    let probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", "Basic")
        .create();
    let _tags = server
        .mock("GET", "/v2/app/tags/list")
        .with_status(200)
        .with_body(r#"{"tags":["1.0"]}"#)
        .create();

    let lister = TagLister::default().with_default_registry(server.url());
    let result = lister
        .list_tags(&TagQuery::new("app", "  "), &Credentials::anonymous())
        .unwrap();

    probe.assert();
    assert_eq!(result.tags, vec!["1.0"]);
}

#[test]
fn test_detect_challenge() {
    let mut server = Server::new();
    let header = bearer_header(&server);
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("Www-Authenticate", &header)
        .create();

    let challenge = TagLister::default().detect_challenge(&server.url()).unwrap();

    assert_eq!(challenge.service(), Some("registry.example"));
    assert_eq!(challenge.realm(), Some(format!("{}/token", server.url()).as_str()));
}
