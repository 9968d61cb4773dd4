// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Storage Infrastructure Module
//!
//! Concrete implementations of the StorageProvider trait.

pub mod local;

pub use local::LocalStorageProvider;

use crate::domain::storage::StorageProvider;
use std::sync::Arc;

/// Storage backend configuration
#[derive(Debug, Clone, Default)]
pub enum StorageBackend {
    /// Local filesystem through tokio::fs
    #[default]
    Local,
}

/// Factory function to create storage provider from configuration
pub fn create_storage_provider(backend: StorageBackend) -> Arc<dyn StorageProvider> {
    match backend {
        StorageBackend::Local => Arc::new(LocalStorageProvider::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_local() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let provider = create_storage_provider(StorageBackend::Local);

        provider.access(temp_dir.path()).await.unwrap();
        assert_eq!(Arc::strong_count(&provider), 1);
    }
}
