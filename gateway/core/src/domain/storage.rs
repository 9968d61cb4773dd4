// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Storage Provider Trait - Anti-Corruption Layer for file I/O
//!
//! Abstracts the byte-level filesystem primitives the gateway needs
//! (create, remove, rename, read, write, list, access) behind one async trait
//! with a fixed error vocabulary. Action handlers only ever see
//! [`StorageError`] and translate it into the gateway's error taxonomy;
//! they never inspect raw OS errors.
//!
//! Enables testing with fault-injecting mocks and keeps the handlers free of
//! any particular filesystem API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// File type for directory entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

/// Directory entry
///
/// Represents a single entry in a directory listing (readdir).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirEntry {
    /// File/directory name (not including path)
    pub name: String,
    pub file_type: FileType,
}

/// Storage provider trait abstracting filesystem operations
///
/// All paths are absolute and have already passed the path guard; the
/// provider does no containment checking of its own.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Create an empty file. Fails with `AlreadyExists` instead of truncating
    /// an existing entry.
    async fn create_file(&self, path: &Path) -> Result<(), StorageError>;

    /// Create a single directory (parents must exist). Fails with
    /// `AlreadyExists` if anything is already at `path`.
    async fn create_directory(&self, path: &Path) -> Result<(), StorageError>;

    /// Remove a file
    async fn remove_file(&self, path: &Path) -> Result<(), StorageError>;

    /// Remove an empty directory
    async fn remove_directory(&self, path: &Path) -> Result<(), StorageError>;

    /// Rename/move a file or directory in one step. An existing file at `to`
    /// is replaced.
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError>;

    /// Read a whole file
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Create or truncate a file and write `data` to it
    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), StorageError>;

    /// List the direct children of a directory
    async fn readdir(&self, path: &Path) -> Result<Vec<DirEntry>, StorageError>;

    /// Succeeds if `path` exists and is accessible
    async fn access(&self, path: &Path) -> Result<(), StorageError>;
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("Is a directory: {0}")]
    IsDirectory(String),

    #[error("Not a directory: {0}")]
    NotDirectory(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to close file: {0}")]
    Close(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => StorageError::NotFound(message),
            ErrorKind::AlreadyExists => StorageError::AlreadyExists(message),
            ErrorKind::DirectoryNotEmpty => StorageError::DirectoryNotEmpty(message),
            ErrorKind::IsADirectory => StorageError::IsDirectory(message),
            ErrorKind::NotADirectory => StorageError::NotDirectory(message),
            ErrorKind::PermissionDenied => StorageError::PermissionDenied(message),
            _ => StorageError::IoError(message),
        }
    }
}
