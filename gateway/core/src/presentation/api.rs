// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Gateway HTTP API
//!
//! Every request under the route prefix goes through one handler: decode the
//! body (multipart staging for uploads, buffered bytes otherwise), dispatch,
//! and render the [`Outcome`]. Paths outside the prefix fall through to the
//! same handler and come back as `ENORES`.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::application::dispatcher::Dispatcher;
use crate::domain::operation::Operation;
use crate::domain::outcome::{FailurePayload, Outcome};
use crate::domain::request::{OperationRequest, RequestPayload};
use crate::presentation::staging::{discard, stage_multipart};

pub struct GatewayState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_bytes: usize,
}

pub fn app(dispatcher: Arc<Dispatcher>, max_body_bytes: usize) -> Router {
    let prefix = dispatcher.route_prefix().to_string();
    let state = Arc::new(GatewayState {
        dispatcher,
        max_body_bytes,
    });

    Router::new()
        .route(&format!("/{prefix}"), any(handle_request))
        .route(&format!("/{prefix}/{{*operation}}"), any(handle_request))
        .fallback(handle_request)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_request(State(state): State<Arc<GatewayState>>, request: Request) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let is_upload =
        method == Method::PUT && state.dispatcher.resolve(uri.path()) == Some(Operation::Upload);
    let payload = if is_upload {
        read_multipart(&state, request).await
    } else {
        read_body(&state, request).await
    };

    let operation_request = OperationRequest::new(method, uri.path())
        .with_query_string(uri.query())
        .with_content_type(content_type)
        .with_payload(payload);

    let outcome = state.dispatcher.dispatch(&operation_request).await;

    // Staged files the client was never told about would be orphaned
    if let (RequestPayload::Staged(files), Outcome::Failure(failure)) =
        (&operation_request.payload, &outcome)
    {
        if !matches!(failure.payload, FailurePayload::Locations(_)) {
            discard(files).await;
        }
    }

    outcome.into_response()
}

async fn read_multipart(state: &GatewayState, request: Request) -> RequestPayload {
    let multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => return RequestPayload::Undecodable(rejection.body_text()),
    };

    match stage_multipart(multipart, state.dispatcher.staging_dir()).await {
        Ok(files) => RequestPayload::Staged(files),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to stage upload");
            RequestPayload::Undecodable(e.to_string())
        }
    }
}

async fn read_body(state: &GatewayState, request: Request) -> RequestPayload {
    match axum::body::to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(bytes) if bytes.is_empty() => RequestPayload::Empty,
        Ok(bytes) => RequestPayload::Raw(bytes),
        Err(e) => RequestPayload::Undecodable(e.to_string()),
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Success(success) => {
                (success.status, success.headers, success.body.into_bytes()).into_response()
            }
            Outcome::Failure(failure) => (
                failure.status,
                failure.headers,
                Bytes::from(failure.payload.render()),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatcher::DispatcherSettings;
    use crate::infrastructure::storage::LocalStorageProvider;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn router(root: &TempDir, staging: &TempDir) -> Router {
        let dispatcher = Dispatcher::new(
            DispatcherSettings {
                root: root.path().to_path_buf(),
                staging_dir: staging.path().to_path_buf(),
                route_prefix: "client-dev-interface".to_string(),
            },
            Arc::new(LocalStorageProvider::new()),
        );
        app(Arc::new(dispatcher), 1024 * 1024)
    }

    #[tokio::test]
    async fn test_outside_prefix_is_enores() {
        let (root, staging) = (TempDir::new().unwrap(), TempDir::new().unwrap());

        let response = router(&root, &staging)
            .oneshot(HttpRequest::builder().uri("/elsewhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Resource not found.");
    }

    #[tokio::test]
    async fn test_save_then_edit() {
        let (root, staging) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let app = router(&root, &staging);

        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method(Method::PUT)
                    .uri("/client-dev-interface/save?Filepath=%2Fnotes.txt")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/client-dev-interface/edit?Filepath=/notes.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello");
    }
}
