// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! `GET /exists?Filepath=`: report whether a path is accessible.

use axum::http::StatusCode;

use super::{guard_path, require_method, require_query, ActionContext};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Success};
use crate::domain::request::OperationRequest;

const OPERATION: Operation = Operation::Exists;

pub async fn handle(ctx: &ActionContext, request: &OperationRequest) -> Result<Success, Failure> {
    require_method(request, OPERATION)?;
    let filepath = require_query(request, "Filepath", OPERATION)?;
    let target = guard_path(ctx, filepath, OPERATION)?;

    match ctx.storage().access(&target).await {
        Ok(()) => Ok(Success::new(
            StatusCode::OK,
            OPERATION.as_str(),
            "filesystem entry exists",
        )),
        Err(e) => {
            tracing::debug!(path = %target.display(), error = %e, "Entry not accessible");
            Err(Failure::new(
                ErrorCode::Enoent,
                StatusCode::NOT_FOUND,
                OPERATION.as_str(),
                "filesystem entry does not exist",
            ))
        }
    }
}
