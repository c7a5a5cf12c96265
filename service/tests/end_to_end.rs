//! End-to-end tests of a bootstrapped service against mock backends.
//! No network access required.

use lexilens_service::{
    AnalysisService, OracleConfig, Provenance, ServiceConfig, SourceConfig, SourceKind,
    TelemetryConfig,
};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn identifies_terms_across_local_and_remote_oracles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract_keywords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keywords": [["gene editing", 0.81], ["CRISPR", 0.77]]
        })))
        .mount(&server)
        .await;

    let config = ServiceConfig {
        oracles: OracleConfig {
            keyphrase_model_endpoint: Some(format!("{}/extract_keywords", server.uri())),
            ..OracleConfig::default()
        },
        ..ServiceConfig::default()
    };
    let service = AnalysisService::bootstrap(&config).unwrap();

    let text = "CRISPR enables gene editing. Gene editing with CRISPR is precise.";
    let terms = service.aggregate_and_rank(text).await.unwrap();

    // Surfaced by the remote model, the frequency oracle, and (for
    // CRISPR) the proper-noun oracle — merged case-insensitively.
    let normalized: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();
    assert!(normalized.contains(&"crispr".to_string()));
    assert!(normalized.contains(&"gene editing".to_string()));
    let mut deduped = normalized.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), normalized.len());
}

#[tokio::test]
async fn remote_oracle_outage_degrades_to_partial_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract_keywords"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = ServiceConfig {
        oracles: OracleConfig {
            keyphrase_model_endpoint: Some(format!("{}/extract_keywords", server.uri())),
            ..OracleConfig::default()
        },
        ..ServiceConfig::default()
    };
    let service = AnalysisService::bootstrap(&config).unwrap();

    let terms = service
        .aggregate_and_rank("Photosynthesis converts light. Photosynthesis feeds plants.")
        .await
        .unwrap();
    assert!(terms
        .iter()
        .any(|t| t.to_lowercase() == "photosynthesis"));
}

#[tokio::test]
async fn explanation_prefers_the_encyclopedia() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/summary/photosynthesis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "standard",
            "extract": "Photosynthesis is how plants turn light into chemical energy."
        })))
        .mount(&server)
        .await;

    let config = ServiceConfig {
        sources: SourceConfig {
            encyclopedia_base_url: Some(format!("{}/summary", server.uri())),
            ..SourceConfig::default()
        },
        ..ServiceConfig::default()
    };
    let service = AnalysisService::bootstrap(&config).unwrap();

    let explanation = service.resolve_explanation("photosynthesis").await.unwrap();
    assert_eq!(
        explanation.provenance,
        Provenance::Source("encyclopedia".into())
    );
    assert!(explanation.text.contains("chemical energy"));
}

#[tokio::test]
async fn encyclopedia_miss_falls_through_to_the_llm() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/summary/.*$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // Default LLM settings use the offline loopback client.
    let config = ServiceConfig {
        sources: SourceConfig {
            encyclopedia_base_url: Some(format!("{}/summary", server.uri())),
            ..SourceConfig::default()
        },
        ..ServiceConfig::default()
    };
    let service = AnalysisService::bootstrap(&config).unwrap();

    let explanation = service.resolve_explanation("obscure-term").await.unwrap();
    assert_eq!(explanation.provenance, Provenance::Source("llm".into()));
}

#[tokio::test]
async fn full_exhaustion_returns_the_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/summary/.*$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = ServiceConfig {
        sources: SourceConfig {
            order: vec![SourceKind::Encyclopedia],
            encyclopedia_base_url: Some(format!("{}/summary", server.uri())),
            ..SourceConfig::default()
        },
        ..ServiceConfig::default()
    };
    let service = AnalysisService::bootstrap(&config).unwrap();

    let explanation = service
        .resolve_explanation("xyzzy-nonexistent-term")
        .await
        .unwrap();
    assert_eq!(explanation.provenance, Provenance::Fallback);
    assert!(explanation.text.contains("xyzzy-nonexistent-term"));
}

#[tokio::test]
async fn telemetry_sinks_capture_the_request_flow() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("lexilens.log");
    let event_path = dir.path().join("lexilens-events.jsonl");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract_keywords"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = ServiceConfig {
        oracles: OracleConfig {
            keyphrase_model_endpoint: Some(format!("{}/extract_keywords", server.uri())),
            ..OracleConfig::default()
        },
        telemetry: TelemetryConfig {
            log_path: Some(log_path.clone()),
            event_log_path: Some(event_path.clone()),
        },
        ..ServiceConfig::default()
    };
    let service = AnalysisService::bootstrap(&config).unwrap();
    service.aggregate_and_rank("Some passage here.").await.unwrap();

    let events = std::fs::read_to_string(&event_path).unwrap();
    assert!(events.contains("extraction.oracle.failed"));
    assert!(events.contains("extraction.aggregate.complete"));
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("keyphrase-model"));
}
