// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Action Handlers
//!
//! One module per simple gateway operation. Every handler runs the same four
//! phases and returns on the first failure:
//!
//! 1. method check (`EMET`, 405 + `Allow`)
//! 2. shape check (`EBODY` / `EQUERY`, 400)
//! 3. path guard on every client-supplied path (`EPATH`, 400)
//! 4. storage effect, with [`StorageError`](crate::domain::storage::StorageError)
//!    translated into an [`ErrorCode`]
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Validate requests and drive the storage provider

pub mod create;
pub mod delete;
pub mod dir_snapshot;
pub mod edit;
pub mod exists;
pub mod move_entry;
pub mod save;

use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::outcome::{ErrorCode, Failure};
use crate::domain::operation::Operation;
use crate::domain::path_guard::PathGuard;
use crate::domain::request::{OperationRequest, RequestPayload};
use crate::domain::storage::StorageProvider;

/// Dependencies shared by the simple action handlers
#[derive(Clone)]
pub struct ActionContext {
    guard: PathGuard,
    storage: Arc<dyn StorageProvider>,
}

impl ActionContext {
    pub fn new(root: impl Into<PathBuf>, storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            guard: PathGuard::new(root),
            storage,
        }
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    pub fn storage(&self) -> &dyn StorageProvider {
        self.storage.as_ref()
    }
}

/// `{Filepath, isDirectory}` body used by create and delete
#[derive(Debug, Deserialize)]
pub struct EntryParams {
    #[serde(rename = "Filepath")]
    pub filepath: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

impl EntryParams {
    pub fn kind(&self) -> &'static str {
        if self.is_directory {
            "directory"
        } else {
            "file"
        }
    }
}

pub(crate) fn require_method(
    request: &OperationRequest,
    operation: Operation,
) -> Result<(), Failure> {
    let allowed = operation.method();
    if request.method != allowed {
        tracing::debug!(
            operation = %operation,
            method = %request.method,
            "Rejected request with wrong method"
        );
        return Err(Failure::method_not_allowed(operation.as_str(), &allowed));
    }
    Ok(())
}

/// Decode the buffered body as JSON into the operation's parameter type
pub(crate) fn parse_json_body<T: DeserializeOwned>(
    request: &OperationRequest,
    operation: Operation,
) -> Result<T, Failure> {
    let body = match &request.payload {
        RequestPayload::Raw(bytes) => bytes,
        RequestPayload::Undecodable(reason) => {
            tracing::debug!(operation = %operation, reason = %reason, "Request body unreadable");
            return Err(bad_body(operation, "request body could not be read"));
        }
        RequestPayload::Empty | RequestPayload::Staged(_) => {
            return Err(bad_body(operation, "request body has incorrect content type/format"));
        }
    };

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(operation = %operation, error = %e, "Request body is not valid JSON for operation");
        bad_body(operation, "request body has incorrect content type/format")
    })
}

pub(crate) fn require_query<'a>(
    request: &'a OperationRequest,
    key: &str,
    operation: Operation,
) -> Result<&'a str, Failure> {
    request.query_param(key).ok_or_else(|| {
        tracing::debug!(operation = %operation, parameter = key, "Missing query parameter");
        Failure::new(
            ErrorCode::Equery,
            StatusCode::BAD_REQUEST,
            operation.as_str(),
            "incorrect querystring",
        )
    })
}

/// Resolve a client path under the root, or fail with `EPATH`
pub(crate) fn guard_path(
    ctx: &ActionContext,
    supplied: &str,
    operation: Operation,
) -> Result<PathBuf, Failure> {
    ctx.guard().resolve(supplied).ok_or_else(|| invalid_path(operation))
}

pub(crate) fn invalid_path(operation: Operation) -> Failure {
    Failure::new(
        ErrorCode::Epath,
        StatusCode::BAD_REQUEST,
        operation.as_str(),
        "invalid filepath",
    )
}

pub(crate) fn bad_body(operation: Operation, message: &str) -> Failure {
    Failure::new(
        ErrorCode::Ebody,
        StatusCode::BAD_REQUEST,
        operation.as_str(),
        message,
    )
}
