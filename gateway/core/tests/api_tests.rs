// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP-level tests for the gateway router
//!
//! Requests are driven through the full axum stack with `tower::ServiceExt`,
//! including multipart upload staging.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use devfs_core::application::dispatcher::{Dispatcher, DispatcherSettings};
use devfs_core::infrastructure::storage::LocalStorageProvider;
use devfs_core::presentation::api::app;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "devfs-test-boundary";

struct TestServer {
    root: TempDir,
    staging: TempDir,
    router: Router,
}

fn server() -> TestServer {
    let root = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new(
        DispatcherSettings {
            root: root.path().to_path_buf(),
            staging_dir: staging.path().to_path_buf(),
            route_prefix: "client-dev-interface".to_string(),
        },
        Arc::new(LocalStorageProvider::new()),
    );
    TestServer {
        root,
        staging,
        router: app(Arc::new(dispatcher), 1024 * 1024),
    }
}

fn multipart_body(files: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (relative_path, contents) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{relative_path}\"; filename=\"upload\"\r\nContent-Type: application/octet-stream\r\n\r\n{contents}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn upload_request(files: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri("/client-dev-interface/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(files)))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn staged_count(server: &TestServer) -> usize {
    std::fs::read_dir(server.staging.path()).unwrap().count()
}

#[tokio::test]
async fn test_multipart_upload_commits_files() {
    let server = server();
    std::fs::create_dir(server.root.path().join("src")).unwrap();

    let response = server
        .router
        .clone()
        .oneshot(upload_request(&[
            ("/index.html", "<html></html>"),
            ("/src/app.js", "start()"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "file(s) successfully uploaded");
    assert_eq!(
        std::fs::read_to_string(server.root.path().join("index.html")).unwrap(),
        "<html></html>"
    );
    assert_eq!(
        std::fs::read_to_string(server.root.path().join("src/app.js")).unwrap(),
        "start()"
    );
    assert_eq!(staged_count(&server), 0);
}

#[tokio::test]
async fn test_upload_failure_returns_locations_and_keeps_staged_files() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(upload_request(&[
            ("/first.txt", "1"),
            ("/missing/second.txt", "2"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let locations: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&body_text(response).await).unwrap();

    assert_eq!(
        locations["/first.txt"],
        server.root.path().join("first.txt").to_string_lossy().as_ref()
    );
    let second = locations["/missing/second.txt"].as_str().unwrap();
    assert!(second.starts_with(server.staging.path().to_string_lossy().as_ref()));
    assert_eq!(std::fs::read_to_string(second).unwrap(), "2");
}

#[tokio::test]
async fn test_rejected_upload_cleans_staging() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(upload_request(&[("/same.txt", "1"), ("/same.txt", "2")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(staged_count(&server), 0);
    assert!(!server.root.path().join("same.txt").exists());
}

#[tokio::test]
async fn test_truncated_upload_leaves_nothing_staged() {
    let server = server();
    let complete = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"/first.txt\"; filename=\"upload\"\r\n\r\nfirst\r\n"
    );
    let cut_off = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"/second.txt\"; filename=\"upload\"\r\n\r\nsecond part without its closing boundary"
    );

    let response = server
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/client-dev-interface/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(complete + &cut_off))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(staged_count(&server), 0);
    assert!(!server.root.path().join("first.txt").exists());
    assert!(!server.root.path().join("second.txt").exists());
}

#[tokio::test]
async fn test_aliased_upload_paths_are_rejected() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(upload_request(&[("/a.txt", "first"), ("a.txt", "second")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(staged_count(&server), 0);
    assert!(!server.root.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_upload_without_multipart_body() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/client-dev-interface/upload")
                .body(Body::from("not multipart"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_method_sets_allow_header() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/client-dev-interface/dir-snapshot?Directory=/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET");
}

#[tokio::test]
async fn test_create_via_http() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/client-dev-interface/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"Filepath":"/docs","isDirectory":true}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/docs");
    assert!(server.root.path().join("docs").is_dir());
}

#[tokio::test]
async fn test_unknown_operation() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/client-dev-interface/format-disk")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Resource not found.");
}

#[tokio::test]
async fn test_create_location_is_percent_encoded() {
    let server = server();

    let response = server
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/client-dev-interface/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"Filepath":"/café","isDirectory":false}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/caf%C3%A9");
    assert!(server.root.path().join("café").is_file());
}
