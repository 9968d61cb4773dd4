// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! `PUT /save?Filepath=`: overwrite (or create) a file with the request body.
//!
//! A declared `Content-Type` must agree with the target's extension. Absent,
//! `application/octet-stream` and `text/plain` declarations are always
//! accepted, as are extensions with no known type.

use axum::http::StatusCode;

use super::{bad_body, guard_path, require_method, require_query, ActionContext};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Success};
use crate::domain::request::{OperationRequest, RequestPayload};
use crate::domain::storage::StorageError;

const OPERATION: Operation = Operation::Save;

pub async fn handle(ctx: &ActionContext, request: &OperationRequest) -> Result<Success, Failure> {
    require_method(request, OPERATION)?;
    let filepath = require_query(request, "Filepath", OPERATION)?;
    let data = match &request.payload {
        RequestPayload::Undecodable(reason) => {
            tracing::debug!(reason = %reason, "Save body unreadable");
            return Err(bad_body(OPERATION, "request body could not be read"));
        }
        RequestPayload::Staged(_) => {
            return Err(bad_body(OPERATION, "request body has incorrect content type/format"));
        }
        payload => payload.bytes().unwrap_or_default(),
    };
    if let Some(content_type) = request.content_type.as_deref() {
        if !content_type_matches(content_type, filepath) {
            tracing::debug!(content_type, path = %filepath, "Content type does not match file extension");
            return Err(Failure::new(
                ErrorCode::Ebody,
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                OPERATION.as_str(),
                "content type does not match file type",
            ));
        }
    }
    let target = guard_path(ctx, filepath, OPERATION)?;

    match ctx.storage().write_file(&target, data).await {
        Ok(()) => {
            tracing::info!(path = %target.display(), bytes = data.len(), "Saved file");
            Ok(Success::new(StatusCode::OK, OPERATION.as_str(), "file saved"))
        }
        Err(StorageError::IsDirectory(_)) => Err(Failure::new(
            ErrorCode::Eisdir,
            StatusCode::CONFLICT,
            OPERATION.as_str(),
            "path is a directory",
        )),
        Err(e) => {
            tracing::error!(path = %target.display(), error = %e, "Failed to save file");
            Err(Failure::new(
                ErrorCode::Ewrite,
                StatusCode::INTERNAL_SERVER_ERROR,
                OPERATION.as_str(),
                "file could not be written",
            ))
        }
    }
}

fn content_type_matches(content_type: &str, filepath: &str) -> bool {
    let declared = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if declared.is_empty() || declared == "application/octet-stream" || declared == "text/plain" {
        return true;
    }

    let guess = mime_guess::from_path(filepath);
    guess.is_empty() || guess.iter().any(|mime| mime.essence_str() == declared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::actions::test_support::context;
    use axum::http::Method;

    fn request(filepath: &str, body: &'static [u8]) -> OperationRequest {
        OperationRequest::new(Method::PUT, "/client-dev-interface/save")
            .with_query_param("Filepath", filepath)
            .with_payload(RequestPayload::Raw(body.into()))
    }

    #[tokio::test]
    async fn test_save_creates_and_overwrites() {
        let (temp_dir, ctx) = context();

        handle(&ctx, &request("/a.txt", b"first")).await.unwrap();
        let success = handle(&ctx, &request("/a.txt", b"second")).await.unwrap();

        assert_eq!(success.status, StatusCode::OK);
        assert_eq!(std::fs::read(temp_dir.path().join("a.txt")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_save_empty_body_truncates() {
        let (temp_dir, ctx) = context();
        std::fs::write(temp_dir.path().join("a.txt"), b"content").unwrap();
        let request = OperationRequest::new(Method::PUT, "/client-dev-interface/save")
            .with_query_param("Filepath", "/a.txt");

        handle(&ctx, &request).await.unwrap();

        assert!(std::fs::read(temp_dir.path().join("a.txt")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_onto_directory() {
        let (temp_dir, ctx) = context();
        std::fs::create_dir(temp_dir.path().join("d")).unwrap();

        let failure = handle(&ctx, &request("/d", b"x")).await.unwrap_err();

        assert_eq!(failure.code, ErrorCode::Eisdir);
        assert_eq!(failure.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_save_rejects_mismatched_content_type() {
        let (temp_dir, ctx) = context();
        let request = request("/page.html", b"{}").with_content_type(Some("application/json".into()));

        let failure = handle(&ctx, &request).await.unwrap_err();

        assert_eq!(failure.code, ErrorCode::Ebody);
        assert_eq!(failure.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(!temp_dir.path().join("page.html").exists());
    }

    #[test]
    fn test_content_type_matching() {
        assert!(content_type_matches("text/html; charset=utf-8", "/index.html"));
        assert!(content_type_matches("application/octet-stream", "/index.html"));
        assert!(content_type_matches("text/plain;charset=UTF-8", "/app.js"));
        assert!(content_type_matches("image/png", "/no-extension"));
        assert!(!content_type_matches("image/png", "/index.html"));
    }
}
