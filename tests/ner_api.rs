//! NER service tests driven through the router.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use docextract::ner::{Entity, NerBackend, NerError, RuleNerBackend};
use docextract::server::{ner_router, NerState};

fn app() -> Router {
    ner_router(NerState::new(Arc::new(RuleNerBackend::new())))
}

fn extract_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn labels(json: &serde_json::Value) -> Vec<(String, String)> {
    json["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["text"].as_str().unwrap().to_string(),
                e["label"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, json) = send(
        app(),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "NER API is running!");
}

#[tokio::test]
async fn test_extract_sentence() {
    let (status, json) = send(
        app(),
        extract_request(r#"{"text": "Apple was founded by Steve Jobs in California."}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entities = labels(&json);
    assert!(entities.contains(&("Apple".to_string(), "ORG".to_string())));
    assert!(entities.contains(&("Steve Jobs".to_string(), "PERSON".to_string())));
    assert!(entities
        .iter()
        .any(|(text, label)| text == "California" && (label == "GPE" || label == "LOC")));

    // Only text and label are exposed.
    let first = json["entities"][0].as_object().unwrap();
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_missing_text_is_empty() {
    let (status, json) = send(app(), extract_request("{}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entities"], serde_json::json!([]));
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, json) = send(app(), extract_request("{\"text\": ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

struct UnavailableNer;

impl NerBackend for UnavailableNer {
    fn backend_id(&self) -> &str {
        "command"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn extract(&self, _text: &str) -> Result<Vec<Entity>, NerError> {
        Err(NerError::BackendNotAvailable("python3 not found".to_string()))
    }
}

#[tokio::test]
async fn test_unavailable_backend() {
    let app = ner_router(NerState::new(Arc::new(UnavailableNer)));
    let (status, json) = send(app, extract_request(r#"{"text": "Apple"}"#)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("python3"));
}
