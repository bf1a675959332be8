//! Video upload endpoint integration tests.
//!
//! Run with: `cargo test -p fusion-api --test video_upload_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use fusion_core::MediaKind;
use helpers::{
    bearer, eventually, setup_test_app, setup_test_app_with, RecordingMediaHost, MAX_VIDEO_BYTES,
};
use std::sync::atomic::Ordering;

fn video_part(data: Vec<u8>) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name("clip.mp4")
        .mime_type("video/mp4")
}

fn video_form(data: Vec<u8>) -> MultipartForm {
    MultipartForm::new()
        .add_part("file", video_part(data))
        .add_text("title", "Holiday")
        .add_text("description", "Beach at sunset")
}

#[tokio::test]
async fn test_upload_video_persists_record() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(video_form(vec![3u8; 4000]).add_text("originalSize", "9000"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Holiday");
    assert_eq!(body["description"], "Beach at sunset");
    assert_eq!(body["originalSize"], 9000);
    assert_eq!(body["compressedSize"], 2000);
    assert_eq!(body["duration"], 12.5);
    assert!(body["publicId"]
        .as_str()
        .expect("publicId")
        .starts_with("video-uploads/"));
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());

    let (options, _) = app.media.last_upload().expect("upload recorded");
    assert_eq!(options.resource_type, MediaKind::Video);
    assert_eq!(options.folder, "video-uploads");
    assert_eq!(options.transformation.as_deref(), Some("q_auto,f_mp4"));
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_upload_video_without_duration_defaults_to_zero() {
    let app = setup_test_app_with(RecordingMediaHost::new(true, None));

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(video_form(vec![3u8; 100]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["duration"], 0.0);
}

#[tokio::test]
async fn test_upload_video_original_size_falls_back_to_payload_length() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(video_form(vec![3u8; 1234]).add_text("originalSize", "not-a-number"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["originalSize"], 1234);
}

#[tokio::test]
async fn test_upload_video_without_title_stores_null() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(MultipartForm::new().add_part("file", video_part(vec![1u8; 10])))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["title"].is_null());
    assert!(body["description"].is_null());
}

#[tokio::test]
async fn test_upload_video_over_limit_never_reaches_media_host() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(video_form(vec![0u8; MAX_VIDEO_BYTES + 1]))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["error"], "File size exceeds maximum limit (2MB)");
    assert_eq!(app.media.upload_count(), 0);
    assert_eq!(app.store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_video_unauthenticated_has_no_side_effects() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/video-upload")
        .multipart(video_form(vec![1u8; 10]))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.media.upload_count(), 0);
    assert_eq!(app.store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_video_media_host_failure_skips_store() {
    let media = RecordingMediaHost::new(true, Some(1.0));
    media.fail_uploads.store(true, Ordering::SeqCst);
    let app = setup_test_app_with(media);

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(video_form(vec![1u8; 10]))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to upload video");
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(app.store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_video_write_failure_removes_orphaned_asset() {
    let app = setup_test_app();
    app.store.fail_writes.store(true, Ordering::SeqCst);

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(video_form(vec![1u8; 10]))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to upload video");
    assert_eq!(body["code"], "WRITE_ERROR");

    let (options, _) = app.media.last_upload().expect("upload recorded");
    assert_eq!(options.folder, "video-uploads");
    let media = app.media.clone();
    assert!(
        eventually(|| !media.destroyed().is_empty()).await,
        "orphaned asset was not removed"
    );
    let destroyed = app.media.destroyed();
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].0, "video-uploads/asset-1");
    assert_eq!(destroyed[0].1, MediaKind::Video);
}

#[tokio::test]
async fn test_uploaded_video_is_listed_first() {
    let app = setup_test_app();
    app.store
        .seed("video-uploads/older", chrono::Utc::now() - chrono::Duration::minutes(5));

    let response = app
        .client()
        .post("/api/video-upload")
        .add_header("Authorization", bearer("user_1"))
        .multipart(video_form(vec![1u8; 10]))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let uploaded: serde_json::Value = response.json();

    let listed: serde_json::Value = app.client().get("/api/videos").await.json();
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], uploaded["id"]);
    assert_eq!(listed[1]["publicId"], "video-uploads/older");
}
