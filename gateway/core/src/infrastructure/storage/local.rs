// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local Filesystem Storage Provider
//!
//! `tokio::fs` implementation of [`StorageProvider`]. Every call is a single
//! awaited filesystem effect; OS errors are classified into [`StorageError`]
//! through its `From<std::io::Error>` impl.
//!
//! **Limitations:**
//! - No locking: concurrent requests on overlapping paths interleave freely
//! - `rename` of a regular file across filesystems falls back to
//!   copy-then-remove, which is not atomic with respect to the source

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::storage::{DirEntry, FileType, StorageError, StorageProvider};

/// Local filesystem storage provider
#[derive(Debug, Clone, Default)]
pub struct LocalStorageProvider;

impl LocalStorageProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    async fn create_file(&self, path: &Path) -> Result<(), StorageError> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        file.flush()
            .await
            .map_err(|e| StorageError::Close(format!("{}: {}", path.display(), e)))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::Close(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> Result<(), StorageError> {
        fs::create_dir(path).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        fs::remove_file(path).await?;
        Ok(())
    }

    async fn remove_directory(&self, path: &Path) -> Result<(), StorageError> {
        fs::remove_dir(path).await?;
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        match fs::rename(from, to).await {
            Err(e) if e.kind() == ErrorKind::CrossesDevices => {
                tracing::debug!(
                    from = %from.display(),
                    to = %to.display(),
                    "Rename crosses filesystems, copying instead"
                );
                move_across_devices(from, to).await
            }
            result => Ok(result?),
        }
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        Ok(fs::read(path).await?)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        fs::write(path, data).await?;
        Ok(())
    }

    async fn readdir(&self, path: &Path) -> Result<Vec<DirEntry>, StorageError> {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(path).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            let file_type = entry.file_type().await?;
            let file_type = if file_type.is_dir() {
                FileType::Directory
            } else if file_type.is_symlink() {
                FileType::Symlink
            } else {
                FileType::File
            };

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                file_type,
            });
        }

        Ok(entries)
    }

    async fn access(&self, path: &Path) -> Result<(), StorageError> {
        fs::symlink_metadata(path).await?;
        Ok(())
    }
}

/// Copy `from` into a hidden sibling of `to`, swap it into place with a
/// same-directory rename, then remove `from`.
///
/// Only regular files are moved this way. The destination is never left
/// half-written.
async fn move_across_devices(from: &Path, to: &Path) -> Result<(), StorageError> {
    let metadata = fs::symlink_metadata(from).await?;
    if !metadata.is_file() {
        return Err(StorageError::IoError(format!(
            "{}: only regular files can be moved across filesystems",
            from.display()
        )));
    }

    let partial = partial_path(to);
    let placed = async {
        fs::copy(from, &partial).await?;
        fs::rename(&partial, to).await
    }
    .await;
    if let Err(e) = placed {
        if let Err(cleanup) = fs::remove_file(&partial).await {
            if cleanup.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %partial.display(), error = %cleanup, "Failed to remove partial copy");
            }
        }
        return Err(e.into());
    }

    // the destination is complete; a leftover source is only wasted space
    if let Err(e) = fs::remove_file(from).await {
        tracing::warn!(path = %from.display(), error = %e, "Failed to remove source after copy");
    }
    Ok(())
}

fn partial_path(to: &Path) -> PathBuf {
    let name = to
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    to.with_file_name(format!(".{}.{}.part", name, Uuid::new_v4()))
}
