//! Listing, health and documentation route tests.
//!
//! Run with: `cargo test -p fusion-api --test videos_list_test`

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::{bearer, setup_test_app, setup_test_app_with, RecordingMediaHost};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_list_videos_is_public_and_newest_first() {
    let app = setup_test_app();
    let now = Utc::now();
    app.store.seed("video-uploads/middle", now - Duration::minutes(2));
    app.store.seed("video-uploads/newest", now);
    app.store.seed("video-uploads/oldest", now - Duration::hours(1));

    let response = app.client().get("/api/videos").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let ids: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v["publicId"].as_str().expect("publicId"))
        .collect();
    assert_eq!(
        ids,
        vec!["video-uploads/newest", "video-uploads/middle", "video-uploads/oldest"]
    );
}

#[tokio::test]
async fn test_list_videos_empty() {
    let app = setup_test_app();

    let response = app.client().get("/api/videos").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_videos_store_failure() {
    let app = setup_test_app();
    app.store.fail_reads.store(true, Ordering::SeqCst);

    let response = app.client().get("/api/videos").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to fetch videos");
    assert_eq!(body["code"], "QUERY_ERROR");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let app = setup_test_app();

    let response = app.client().get("/api/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["media"], "configured");
}

#[tokio::test]
async fn test_health_degraded_still_ok() {
    let app = setup_test_app_with(RecordingMediaHost::new(false, None));
    app.store.fail_reads.store(true, Ordering::SeqCst);

    let response = app.client().get("/api/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "Database unavailable");
    assert!(!body.to_string().contains("connection refused"));
    assert_eq!(body["media"], "missing configuration");
}

#[tokio::test]
async fn test_openapi_document_is_public() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/video-upload"].is_object());
    assert!(body["components"]["schemas"]["MediaRecord"].is_object());
}

#[tokio::test]
async fn test_unknown_route_for_signed_in_caller_is_404() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/api/does-not-exist")
        .add_header("Authorization", bearer("user_1"))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}
