// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! `GET /dir-snapshot?Directory=`: list a directory's direct children.

use axum::http::StatusCode;
use serde::Serialize;

use super::{guard_path, require_method, require_query, ActionContext};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Success};
use crate::domain::request::OperationRequest;
use crate::domain::storage::{FileType, StorageError};

const OPERATION: Operation = Operation::DirSnapshot;

/// One listed child, serialized as `{"name": .., "isDirectory": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub name: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

pub async fn handle(ctx: &ActionContext, request: &OperationRequest) -> Result<Success, Failure> {
    require_method(request, OPERATION)?;
    let directory = require_query(request, "Directory", OPERATION)?;
    let target = guard_path(ctx, directory, OPERATION)?;

    let entries = match ctx.storage().readdir(&target).await {
        Ok(entries) => entries,
        Err(StorageError::NotDirectory(_)) => {
            return Err(Failure::new(
                ErrorCode::Enotdir,
                StatusCode::CONFLICT,
                OPERATION.as_str(),
                "path is not a directory",
            ))
        }
        Err(StorageError::NotFound(_)) => {
            return Err(Failure::new(
                ErrorCode::Enoent,
                StatusCode::CONFLICT,
                OPERATION.as_str(),
                "directory does not exist",
            ))
        }
        Err(e) => {
            tracing::error!(path = %target.display(), error = %e, "Failed to list directory");
            return Err(read_failure());
        }
    };

    let mut snapshot: Vec<SnapshotEntry> = entries
        .into_iter()
        .map(|entry| SnapshotEntry {
            is_directory: entry.file_type == FileType::Directory,
            name: entry.name,
        })
        .collect();
    snapshot.sort_by(|a, b| a.name.cmp(&b.name));

    let json = serde_json::to_string(&snapshot).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize directory snapshot");
        read_failure()
    })?;
    tracing::debug!(path = %target.display(), entries = snapshot.len(), "Listed directory");
    Ok(Success::json(StatusCode::OK, OPERATION.as_str(), json))
}

fn read_failure() -> Failure {
    Failure::new(
        ErrorCode::Eread,
        StatusCode::INTERNAL_SERVER_ERROR,
        OPERATION.as_str(),
        "directory could not be read",
    )
}
