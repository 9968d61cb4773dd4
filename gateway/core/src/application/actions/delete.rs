// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! `DELETE /delete`: remove a file or an empty directory.

use axum::http::StatusCode;

use super::{guard_path, invalid_path, parse_json_body, require_method, ActionContext, EntryParams};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Success};
use crate::domain::request::OperationRequest;
use crate::domain::storage::StorageError;

const OPERATION: Operation = Operation::Delete;

pub async fn handle(ctx: &ActionContext, request: &OperationRequest) -> Result<Success, Failure> {
    require_method(request, OPERATION)?;
    let params: EntryParams = parse_json_body(request, OPERATION)?;
    let target = guard_path(ctx, &params.filepath, OPERATION)?;
    if target == ctx.root() {
        tracing::warn!(path = %params.filepath, "Refusing to delete the gateway root");
        return Err(invalid_path(OPERATION));
    }

    let result = if params.is_directory {
        ctx.storage().remove_directory(&target).await
    } else {
        ctx.storage().remove_file(&target).await
    };

    match result {
        Ok(()) => {
            tracing::info!(path = %target.display(), kind = params.kind(), "Deleted entry");
            Ok(Success::new(
                StatusCode::OK,
                OPERATION.as_str(),
                if params.is_directory {
                    "Directory successfully deleted."
                } else {
                    "File successfully deleted."
                },
            ))
        }
        Err(StorageError::NotFound(_)) => Err(Failure::new(
            ErrorCode::Enoent,
            StatusCode::CONFLICT,
            OPERATION.as_str(),
            "system object does not exist",
        )),
        // Some platforms report a non-empty rmdir as EEXIST
        Err(StorageError::DirectoryNotEmpty(_)) | Err(StorageError::AlreadyExists(_))
            if params.is_directory =>
        {
            Err(Failure::new(
                ErrorCode::Enotempty,
                StatusCode::CONFLICT,
                OPERATION.as_str(),
                "directory is not empty",
            ))
        }
        Err(e) => {
            tracing::error!(path = %target.display(), error = %e, "Failed to delete entry");
            Err(Failure::new(
                ErrorCode::Erment,
                StatusCode::INTERNAL_SERVER_ERROR,
                OPERATION.as_str(),
                format!("{} could not be deleted", params.kind()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::actions::test_support::context;
    use axum::http::Method;
    use serde_json::json;

    fn request(body: serde_json::Value) -> OperationRequest {
        OperationRequest::new(Method::DELETE, "/client-dev-interface/delete").with_json(&body)
    }

    #[tokio::test]
    async fn test_delete_file() {
        let (temp_dir, ctx) = context();
        std::fs::write(temp_dir.path().join("a.txt"), b"x").unwrap();

        let success = handle(&ctx, &request(json!({ "Filepath": "/a.txt", "isDirectory": false })))
            .await
            .unwrap();

        assert_eq!(success.status, StatusCode::OK);
        assert!(!temp_dir.path().join("a.txt").exists());
    }

    #[tokio::test]
    async fn test_delete_non_empty_directory_is_conflict() {
        let (temp_dir, ctx) = context();
        std::fs::create_dir(temp_dir.path().join("d")).unwrap();
        std::fs::write(temp_dir.path().join("d/f"), b"x").unwrap();

        let failure = handle(&ctx, &request(json!({ "Filepath": "/d", "isDirectory": true })))
            .await
            .unwrap_err();

        assert_eq!(failure.code, ErrorCode::Enotempty);
        assert_eq!(failure.status, StatusCode::CONFLICT);
        assert!(temp_dir.path().join("d/f").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_entry() {
        let (_temp_dir, ctx) = context();

        let failure = handle(&ctx, &request(json!({ "Filepath": "/nope", "isDirectory": false })))
            .await
            .unwrap_err();

        assert_eq!(failure.code, ErrorCode::Enoent);
        assert_eq!(failure.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_directory_as_file_fails() {
        let (temp_dir, ctx) = context();
        std::fs::create_dir(temp_dir.path().join("d")).unwrap();

        let failure = handle(&ctx, &request(json!({ "Filepath": "/d", "isDirectory": false })))
            .await
            .unwrap_err();

        assert_eq!(failure.code, ErrorCode::Erment);
        assert!(temp_dir.path().join("d").is_dir());
    }

    #[tokio::test]
    async fn test_delete_root_is_rejected() {
        let (temp_dir, ctx) = context();

        let failure = handle(&ctx, &request(json!({ "Filepath": "/", "isDirectory": true })))
            .await
            .unwrap_err();

        assert_eq!(failure.code, ErrorCode::Epath);
        assert!(temp_dir.path().is_dir());
    }
}
