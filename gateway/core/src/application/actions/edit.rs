// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! `GET /edit?Filepath=`: return a file's bytes, typed by its extension.

use axum::http::StatusCode;

use super::{guard_path, require_method, require_query, ActionContext};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Success};
use crate::domain::request::OperationRequest;
use crate::domain::storage::StorageError;

const OPERATION: Operation = Operation::Edit;

pub async fn handle(ctx: &ActionContext, request: &OperationRequest) -> Result<Success, Failure> {
    require_method(request, OPERATION)?;
    let filepath = require_query(request, "Filepath", OPERATION)?;
    let target = guard_path(ctx, filepath, OPERATION)?;

    match ctx.storage().read_file(&target).await {
        Ok(data) => {
            let mime = mime_guess::from_path(&target).first_or_octet_stream();
            tracing::debug!(path = %target.display(), bytes = data.len(), mime = %mime, "Read file");
            Ok(Success::binary(StatusCode::OK, OPERATION.as_str(), mime.as_ref(), data))
        }
        Err(StorageError::NotFound(_)) => Err(Failure::new(
            ErrorCode::Enoent,
            StatusCode::NOT_FOUND,
            OPERATION.as_str(),
            "file does not exist",
        )),
        Err(StorageError::IsDirectory(_)) => Err(Failure::new(
            ErrorCode::Eisdir,
            StatusCode::CONFLICT,
            OPERATION.as_str(),
            "path is a directory",
        )),
        Err(e) => {
            tracing::error!(path = %target.display(), error = %e, "Failed to read file");
            Err(Failure::new(
                ErrorCode::Eread,
                StatusCode::INTERNAL_SERVER_ERROR,
                OPERATION.as_str(),
                "file could not be read",
            ))
        }
    }
}
