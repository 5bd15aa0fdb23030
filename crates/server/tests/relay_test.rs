//! End-to-end tests for the relay endpoint, with the Notion API mocked.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use grammly_core::AppConfig;
use grammly_server::{AppState, router};

fn app_with(config: AppConfig) -> axum::Router {
    router(AppState { config: Arc::new(config) })
}

fn configured(base_url: String) -> AppConfig {
    AppConfig {
        notion_api_key: Some("secret_test".into()),
        notion_database_id: Some("db1".into()),
        notion_base_url: base_url,
        ..Default::default()
    }
}

async fn get_questions(app: axum::Router) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/questions")
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("body should be JSON");

    (status, headers, json)
}

#[tokio::test]
async fn missing_api_key_fails_without_calling_upstream() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = AppConfig {
        notion_api_key: None,
        notion_database_id: Some("db1".into()),
        notion_base_url: server.url(),
        ..Default::default()
    };

    let (status, _, body) = get_questions(app_with(config)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("notion_api_key"));
    upstream.assert_async().await;
}

#[tokio::test]
async fn missing_database_id_fails_without_calling_upstream() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = AppConfig {
        notion_api_key: Some("secret_test".into()),
        notion_database_id: None,
        notion_base_url: server.url(),
        ..Default::default()
    };

    let (status, _, body) = get_questions(app_with(config)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("notion_database_id"));
    upstream.assert_async().await;
}

#[tokio::test]
async fn upstream_error_status_and_body_are_forwarded() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/databases/db1/query")
        .with_status(403)
        .with_body(r#"{"object":"error","code":"restricted_resource"}"#)
        .create_async()
        .await;

    let (status, headers, body) = get_questions(app_with(configured(server.url()))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("restricted_resource"));
    // Error responses carry only the JSON body, no caching headers.
    assert!(headers.get("cache-control").is_none());
}

#[tokio::test]
async fn network_failure_collapses_to_500_with_message() {
    // Nothing listens here; the connection is refused.
    let config = configured("http://127.0.0.1:1".into());

    let (status, _, body) = get_questions(app_with(config)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn success_groups_by_unit_and_sets_headers() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/databases/db1/query")
        .with_status(200)
        .with_body(
            r#"{"results": [
                {"properties": {
                    "問題文": {"type": "title", "title": [{"plain_text": "Q1"}]},
                    "正解": {"type": "select", "select": {"name": "C"}},
                    "単元": {"type": "select", "select": {"name": "Unit1"}}
                }},
                {"properties": {
                    "問題文": {"type": "title", "title": [{"plain_text": "orphan"}]},
                    "正解": {"type": "select", "select": {"name": "A"}},
                    "単元": {"type": "select", "select": {"name": ""}}
                }}
            ], "has_more": false}"#,
        )
        .create_async()
        .await;

    let (status, headers, body) = get_questions(app_with(configured(server.url()))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(headers.get("cache-control").unwrap(), "public, max-age=300");
    assert!(
        headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );

    let questions = body["questions"].as_object().unwrap();
    assert_eq!(questions.keys().collect::<Vec<_>>(), vec!["Unit1"]);
    assert_eq!(questions["Unit1"].as_array().unwrap().len(), 1);
    assert_eq!(questions["Unit1"][0]["answer"], 2);
    assert_eq!(questions["Unit1"][0]["q"], "Q1");
}

#[tokio::test]
async fn success_preserves_upstream_order_within_groups() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/databases/db1/query")
        .with_status(200)
        .with_body(
            r#"{"results": [
                {"properties": {
                    "問題文": {"type": "title", "title": [{"plain_text": "first"}]},
                    "単元": {"type": "select", "select": {"name": "Unit1"}}
                }},
                {"properties": {
                    "問題文": {"type": "title", "title": [{"plain_text": "second"}]},
                    "単元": {"type": "select", "select": {"name": "Unit2"}}
                }},
                {"properties": {
                    "問題文": {"type": "title", "title": [{"plain_text": "third"}]},
                    "単元": {"type": "select", "select": {"name": "Unit1"}}
                }}
            ], "has_more": false}"#,
        )
        .create_async()
        .await;

    let (status, _, body) = get_questions(app_with(configured(server.url()))).await;

    assert_eq!(status, StatusCode::OK);
    let unit1 = body["questions"]["Unit1"].as_array().unwrap();
    assert_eq!(unit1.iter().map(|q| q["q"].as_str().unwrap()).collect::<Vec<_>>(), vec!["first", "third"]);
}
