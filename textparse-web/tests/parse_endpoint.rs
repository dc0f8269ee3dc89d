//! Testes de integração HTTP de `POST /parse`, sem abrir socket.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use textparse_core::{NerPipeline, PipelineConfig};
use textparse_web::{router, AppState, ParseResponse};
use tower::ServiceExt;

fn app_with(config: &PipelineConfig) -> Router {
    let pipeline = NerPipeline::configured(config).unwrap();
    router(Arc::new(AppState::new(pipeline)))
}

fn app() -> Router {
    app_with(&PipelineConfig::default())
}

fn post_parse(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/parse")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn parse(app: Router, text: &str) -> ParseResponse {
    let body = serde_json::json!({ "text": text }).to_string();
    let resp = app.oneshot(post_parse(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn pair(text: &str, label: &str) -> (String, String) {
    (text.to_string(), label.to_string())
}

#[tokio::test]
async fn test_cafe_downtown() {
    let resp = parse(app(), "cafe downtown").await;
    assert_eq!(resp.tokens, ["cafe", "downtown"]);
    assert!(resp.entities.contains(&pair("cafe", "BUSINESS_TYPE")));
    assert!(resp.entities.contains(&pair("downtown", "LOCATION")));
}

#[tokio::test]
async fn test_response_shape() {
    let body = serde_json::json!({ "text": "cafe downtown" }).to_string();
    let resp = app().oneshot(post_parse(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["tokens"], serde_json::json!(["cafe", "downtown"]));
    // Cada entidade é um par [texto, label]
    assert_eq!(json["entities"][0], serde_json::json!(["cafe", "BUSINESS_TYPE"]));
}

#[tokio::test]
async fn test_empty_text_is_valid() {
    let resp = parse(app(), "").await;
    assert!(resp.tokens.is_empty());
    assert!(resp.entities.is_empty());
}

#[tokio::test]
async fn test_hello_world() {
    let resp = parse(app(), "hello world").await;
    assert_eq!(resp.tokens, ["hello", "world"]);
    assert!(resp.entities.is_empty());
}

#[tokio::test]
async fn test_statistical_entities_alongside_rules() {
    let resp = parse(app(), "A restaurant for sale in Leeds, asking £95,000.").await;
    assert!(resp.entities.contains(&pair("restaurant", "BUSINESS_TYPE")));
    assert!(resp.entities.contains(&pair("Leeds", "GPE")));
    assert!(resp.entities.contains(&pair("£95,000", "MONEY")));
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let app = app();
    let text = "Family cafe downtown, near the Thames in London.";
    let first = parse(app.clone(), text).await;
    for _ in 0..3 {
        assert_eq!(parse(app.clone(), text).await, first);
    }
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let resp = app().oneshot(post_parse("{not json")).await.unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_missing_text_field_rejected() {
    let resp = app()
        .oneshot(post_parse(r#"{"content": "cafe"}"#))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_get_not_allowed() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/parse")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"text": "cafe"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_extra_patterns_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"label": "BUSINESS_TYPE", "pattern": [{{"LOWER": "bakery"}}]}}"#
    )
    .unwrap();

    let config = PipelineConfig {
        patterns_file: Some(file.path().to_path_buf()),
        ..PipelineConfig::default()
    };
    let resp = parse(app_with(&config), "bakery downtown").await;
    assert_eq!(
        resp.entities,
        [pair("bakery", "BUSINESS_TYPE"), pair("downtown", "LOCATION")]
    );
}
