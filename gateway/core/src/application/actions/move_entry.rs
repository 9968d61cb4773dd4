// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! `PATCH /move`: rename a file or directory within the root.

use axum::http::StatusCode;
use serde::Deserialize;

use super::{guard_path, invalid_path, parse_json_body, require_method, ActionContext};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Success};
use crate::domain::request::OperationRequest;
use crate::domain::storage::StorageError;

const OPERATION: Operation = Operation::Move;

#[derive(Debug, Deserialize)]
pub struct MoveParams {
    #[serde(rename = "oldPath")]
    pub old_path: String,
    #[serde(rename = "newPath")]
    pub new_path: String,
}

pub async fn handle(ctx: &ActionContext, request: &OperationRequest) -> Result<Success, Failure> {
    require_method(request, OPERATION)?;
    let params: MoveParams = parse_json_body(request, OPERATION)?;
    let from = guard_path(ctx, &params.old_path, OPERATION)?;
    let to = guard_path(ctx, &params.new_path, OPERATION)?;
    if from == ctx.root() || to == ctx.root() {
        tracing::warn!(from = %params.old_path, to = %params.new_path, "Refusing to move the gateway root");
        return Err(invalid_path(OPERATION));
    }

    match ctx.storage().rename(&from, &to).await {
        Ok(()) => {
            tracing::info!(from = %from.display(), to = %to.display(), "Moved entry");
            Ok(Success::new(StatusCode::OK, OPERATION.as_str(), "move successful"))
        }
        Err(StorageError::NotFound(_)) => Err(Failure::new(
            ErrorCode::Enoent,
            StatusCode::CONFLICT,
            OPERATION.as_str(),
            "system object does not exist",
        )),
        Err(StorageError::DirectoryNotEmpty(_)) | Err(StorageError::AlreadyExists(_)) => {
            Err(Failure::new(
                ErrorCode::Enotempty,
                StatusCode::CONFLICT,
                OPERATION.as_str(),
                "destination directory is not empty",
            ))
        }
        Err(e) => {
            tracing::error!(from = %from.display(), to = %to.display(), error = %e, "Failed to move entry");
            Err(Failure::new(
                ErrorCode::Emove,
                StatusCode::INTERNAL_SERVER_ERROR,
                OPERATION.as_str(),
                "entry could not be moved",
            ))
        }
    }
}
