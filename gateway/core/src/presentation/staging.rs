// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Multipart Upload Staging
//!
//! Streams every file part of a multipart body into its own randomly named
//! file under the staging directory. The multipart field name carries the
//! file's intended path relative to the root; the upload service later moves
//! each staged file there.
//!
//! Parts without a filename are form fields, not files, and are skipped.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::request::StagedFile;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("file part has no field name")]
    UnnamedPart,

    #[error("failed to write staged file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stage all file parts of `multipart` in `staging_dir`.
///
/// On error every file staged so far by this call is removed again.
pub async fn stage_multipart(
    mut multipart: Multipart,
    staging_dir: &Path,
) -> Result<Vec<StagedFile>, StagingError> {
    let mut staged = Vec::new();

    let result: Result<(), StagingError> = async {
        while let Some(field) = multipart.next_field().await? {
            if field.file_name().is_none() {
                tracing::debug!(field = ?field.name(), "Skipping non-file multipart field");
                continue;
            }
            let relative_path = field
                .name()
                .filter(|name| !name.is_empty())
                .ok_or(StagingError::UnnamedPart)?
                .to_string();
            let temp_path = staging_dir.join(Uuid::new_v4().to_string());

            // registered before writing so a half-written file is cleaned up too
            staged.push(StagedFile::new(relative_path, temp_path.clone()));
            let bytes = write_part(field, &temp_path).await?;
            tracing::debug!(temp_path = %temp_path.display(), bytes, "Staged upload part");
        }
        Ok(())
    }
    .await;

    match result {
        Ok(()) => Ok(staged),
        Err(e) => {
            discard(&staged).await;
            Err(e)
        }
    }
}

async fn write_part(mut field: Field<'_>, temp_path: &Path) -> Result<u64, StagingError> {
    let io_error = |source: std::io::Error| StagingError::Io {
        path: temp_path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(temp_path).await.map_err(io_error)?;
    let mut written = 0u64;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_error)?;
    Ok(written)
}

/// Best-effort removal of staged files that will never be committed
pub async fn discard(files: &[StagedFile]) {
    for file in files {
        if let Err(e) = fs::remove_file(&file.temp_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    temp_path = %file.temp_path.display(),
                    error = %e,
                    "Failed to remove staged file"
                );
            }
        }
    }
}
