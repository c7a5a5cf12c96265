//! Mock-server tests for the HTTP-backed knowledge sources.
//! No network access required.

use lexilens_explanation::{
    CompletionClient, EncyclopediaSource, HttpCompletionClient, KnowledgeSource, LookupOutcome,
    SourceError,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn summary_source(server: &MockServer) -> EncyclopediaSource {
    EncyclopediaSource::new().with_base_url(format!("{}/api/rest_v1/page/summary", server.uri()))
}

#[tokio::test]
async fn summary_is_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Photosynthesis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "standard",
            "extract": "Photosynthesis is the process plants use to convert light into energy."
        })))
        .mount(&server)
        .await;

    let outcome = summary_source(&server)
        .lookup("Photosynthesis")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        LookupOutcome::Found(
            "Photosynthesis is the process plants use to convert light into energy.".into()
        )
    );
}

#[tokio::test]
async fn missing_page_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/rest_v1/page/summary/.*$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "https://mediawiki.org/wiki/HyperSwitch/errors/not_found"
        })))
        .mount(&server)
        .await;

    let outcome = summary_source(&server).lookup("xyzzy-nothing").await.unwrap();
    assert_eq!(outcome, LookupOutcome::NotFound);
}

#[tokio::test]
async fn disambiguation_page_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/rest_v1/page/summary/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "disambiguation",
            "extract": "Mercury may refer to:"
        })))
        .mount(&server)
        .await;

    let outcome = summary_source(&server).lookup("Mercury").await.unwrap();
    assert_eq!(outcome, LookupOutcome::NotFound);
}

#[tokio::test]
async fn blank_extract_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/rest_v1/page/summary/.*$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "type": "standard", "extract": "   " })),
        )
        .mount(&server)
        .await;

    let outcome = summary_source(&server).lookup("Stub").await.unwrap();
    assert_eq!(outcome, LookupOutcome::NotFound);
}

#[tokio::test]
async fn server_error_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/rest_v1/page/summary/.*$"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let error = summary_source(&server).lookup("Anything").await.unwrap_err();
    assert!(matches!(error, SourceError::Transport(_)));
}

#[tokio::test]
async fn long_extract_is_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/rest_v1/page/summary/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "standard",
            "extract": "x".repeat(5000)
        })))
        .mount(&server)
        .await;

    let source = summary_source(&server).with_max_chars(100);
    let outcome = source.lookup("Verbose").await.unwrap();
    assert!(matches!(outcome, LookupOutcome::Found(text) if text.chars().count() == 100));
}

#[tokio::test]
async fn chat_completion_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Entropy measures disorder." }
            }]
        })))
        .mount(&server)
        .await;

    let client = HttpCompletionClient::new(server.uri(), "test-key", "gpt-4o-mini");
    let completion = client.complete("Explain entropy").await.unwrap();
    assert_eq!(completion, "Entropy measures disorder.");
}

#[tokio::test]
async fn completion_without_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = HttpCompletionClient::new(server.uri(), "test-key", "gpt-4o-mini");
    let error = client.complete("Explain entropy").await.unwrap_err();
    assert!(matches!(error, SourceError::Malformed(_)));
}
