// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! `PUT /create`: make an empty file or a single directory.

use axum::http::{header, StatusCode};
use url::Url;

use super::{guard_path, parse_json_body, require_method, ActionContext, EntryParams};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Success};
use crate::domain::request::OperationRequest;
use crate::domain::storage::StorageError;

const OPERATION: Operation = Operation::Create;

pub async fn handle(ctx: &ActionContext, request: &OperationRequest) -> Result<Success, Failure> {
    require_method(request, OPERATION)?;
    let params: EntryParams = parse_json_body(request, OPERATION)?;
    let target = guard_path(ctx, &params.filepath, OPERATION)?;

    let result = if params.is_directory {
        ctx.storage().create_directory(&target).await
    } else {
        ctx.storage().create_file(&target).await
    };

    match result {
        Ok(()) => {
            tracing::info!(path = %target.display(), kind = params.kind(), "Created entry");
            Ok(
                Success::new(StatusCode::CREATED, OPERATION.as_str(), format!("{} created", params.kind()))
                    .with_header(header::LOCATION, &location(&params.filepath)),
            )
        }
        Err(StorageError::AlreadyExists(_)) => Err(Failure::new(
            ErrorCode::Eentex,
            StatusCode::CONFLICT,
            OPERATION.as_str(),
            format!("{} already exists in filesystem", params.kind()),
        )),
        Err(StorageError::Close(reason)) => {
            tracing::error!(path = %target.display(), error = %reason, "Created file could not be closed");
            Err(Failure::new(
                ErrorCode::Eclose,
                StatusCode::INTERNAL_SERVER_ERROR,
                OPERATION.as_str(),
                "file could not be closed",
            ))
        }
        Err(e) => {
            tracing::error!(path = %target.display(), error = %e, "Failed to create entry");
            Err(Failure::new(
                ErrorCode::Ecrent,
                StatusCode::INTERNAL_SERVER_ERROR,
                OPERATION.as_str(),
                format!("{} could not be created", params.kind()),
            ))
        }
    }
}

/// Client path as a percent-encoded URL path, e.g. `/café` -> `/caf%C3%A9`
fn location(filepath: &str) -> String {
    match Url::parse("http://localhost/") {
        Ok(mut url) => {
            url.set_path(filepath);
            url.path().to_string()
        }
        Err(_) => filepath.to_string(),
    }
}
