// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Upload Commit Service
//!
//! Moves staged multipart files from the staging directory to their final
//! places under the root, one at a time in request order.
//!
//! The commit is not transactional. When a file cannot be placed the service
//! stops, leaves every earlier file where it landed and every later file in
//! staging, and returns a [`LocationsMap`] so the client can see which files
//! moved and which still sit in staging.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Validate staged uploads and commit them into the root

use axum::http::StatusCode;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::actions::{bad_body, require_method};
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, LocationsMap, Success};
use crate::domain::path_guard::{is_contained, PathGuard};
use crate::domain::request::{OperationRequest, RequestPayload, StagedFile};
use crate::domain::storage::{StorageError, StorageProvider};

const OPERATION: Operation = Operation::Upload;

/// Commits staged uploads into the root directory
#[derive(Clone)]
pub struct UploadService {
    guard: PathGuard,
    staging_dir: PathBuf,
    storage: Arc<dyn StorageProvider>,
}

impl UploadService {
    pub fn new(
        root: impl Into<PathBuf>,
        staging_dir: impl Into<PathBuf>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            guard: PathGuard::new(root),
            staging_dir: staging_dir.into(),
            storage,
        }
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        &self.staging_dir
    }

    pub async fn handle(&self, request: &OperationRequest) -> Result<Success, Failure> {
        require_method(request, OPERATION)?;
        let files = self.validate(&request.payload)?;
        self.commit(files).await
    }

    /// Shape check: a non-empty staged set with distinct relative paths, every
    /// temp file living in the staging directory.
    ///
    /// Paths are compared by the target they resolve to, so `/a.txt`, `a.txt`
    /// and `/./a.txt` count as the same file. Paths that escape the root are
    /// left for the commit loop to report as `EPATH`.
    fn validate<'a>(&self, payload: &'a RequestPayload) -> Result<&'a [StagedFile], Failure> {
        let files = match payload {
            RequestPayload::Staged(files) if !files.is_empty() => files.as_slice(),
            RequestPayload::Undecodable(reason) => {
                tracing::debug!(reason = %reason, "Upload body could not be decoded");
                return Err(bad_body(OPERATION, "request body could not be read"));
            }
            _ => return Err(bad_body(OPERATION, "no files were uploaded")),
        };

        let mut seen = HashSet::new();
        let mut targets = HashSet::new();
        for file in files {
            if file.relative_path.trim_matches(['/', '\\']).is_empty() {
                return Err(bad_body(OPERATION, "uploaded file has no relative path"));
            }
            let aliased = self
                .guard
                .resolve(&file.relative_path)
                .is_some_and(|target| !targets.insert(target));
            if !seen.insert(file.relative_path.as_str()) || aliased {
                tracing::debug!(path = %file.relative_path, "Duplicate upload path");
                return Err(bad_body(OPERATION, "duplicate relative path in upload"));
            }
            if !is_contained(&file.temp_path, &self.staging_dir) {
                tracing::warn!(
                    temp_path = %file.temp_path.display(),
                    staging_dir = %self.staging_dir.display(),
                    "Staged file outside staging directory"
                );
                return Err(bad_body(OPERATION, "staged file is outside the staging directory"));
            }
        }
        Ok(files)
    }

    /// Place each staged file at `root/<relative_path>`, stopping at the first
    /// failure.
    pub async fn commit(&self, files: &[StagedFile]) -> Result<Success, Failure> {
        let mut locations: LocationsMap = files
            .iter()
            .map(|file| {
                (
                    file.relative_path.clone(),
                    file.temp_path.to_string_lossy().into_owned(),
                )
            })
            .collect();

        for (index, file) in files.iter().enumerate() {
            let Some(target) = self.guard.resolve(&file.relative_path) else {
                tracing::warn!(
                    path = %file.relative_path,
                    committed = index,
                    "Upload target outside root, stopping commit"
                );
                return Err(Failure::locations(
                    ErrorCode::Epath,
                    StatusCode::BAD_REQUEST,
                    OPERATION.as_str(),
                    locations,
                ));
            };

            if let Err(e) = self.storage.rename(&file.temp_path, &target).await {
                let code = match e {
                    StorageError::NotFound(_) => ErrorCode::Enoent,
                    _ => ErrorCode::Emove,
                };
                tracing::error!(
                    path = %file.relative_path,
                    destination = %target.display(),
                    committed = index,
                    error = %e,
                    "Failed to commit uploaded file"
                );
                return Err(Failure::locations(
                    code,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    OPERATION.as_str(),
                    locations,
                ));
            }

            locations.insert(
                file.relative_path.clone(),
                target.to_string_lossy().into_owned(),
            );
        }

        tracing::info!(files = files.len(), "Committed upload");
        Ok(Success::new(
            StatusCode::OK,
            OPERATION.as_str(),
            "file(s) successfully uploaded",
        ))
    }
}
