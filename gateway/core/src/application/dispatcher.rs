// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Dispatcher Application Service
//!
//! Routes an [`OperationRequest`] to exactly one operation handler based on
//! the path segment after the route prefix, and returns exactly one
//! [`Outcome`]. Unknown or missing operation names produce `ENORES`, tagged
//! with the route prefix itself.
//!
//! Every dispatched request is counted in `devfs_operations_total`, labelled
//! by operation name and outcome code.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Operation routing and outcome accounting

use axum::http::StatusCode;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;

use crate::application::actions::{
    create, delete, dir_snapshot, edit, exists, move_entry, save, ActionContext,
};
use crate::application::upload::UploadService;
use crate::domain::gateway_config::GatewayConfigManifest;
use crate::domain::operation::Operation;
use crate::domain::outcome::{ErrorCode, Failure, Outcome};
use crate::domain::request::OperationRequest;
use crate::domain::storage::StorageProvider;

/// Directories and routing the dispatcher is built from
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub root: PathBuf,
    pub staging_dir: PathBuf,
    pub route_prefix: String,
}

impl From<&GatewayConfigManifest> for DispatcherSettings {
    fn from(config: &GatewayConfigManifest) -> Self {
        Self {
            root: config.spec.storage.root.clone(),
            staging_dir: config.spec.storage.staging_dir.clone(),
            route_prefix: config.spec.network.route_prefix.clone(),
        }
    }
}

pub struct Dispatcher {
    route_prefix: String,
    actions: ActionContext,
    upload: UploadService,
}

impl Dispatcher {
    pub fn new(settings: DispatcherSettings, storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            route_prefix: settings.route_prefix.trim_matches('/').to_string(),
            actions: ActionContext::new(settings.root.clone(), storage.clone()),
            upload: UploadService::new(settings.root, settings.staging_dir, storage),
        }
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        self.upload.staging_dir()
    }

    /// Operation addressed by a request target, if any
    pub fn resolve(&self, target: &str) -> Option<Operation> {
        Operation::from_target(target, &self.route_prefix)
    }

    pub async fn dispatch(&self, request: &OperationRequest) -> Outcome {
        let Some(operation) = self.resolve(&request.target) else {
            tracing::debug!(path = %request.target, method = %request.method, "No operation for request target");
            let outcome = Outcome::Failure(Failure::new(
                ErrorCode::Enores,
                StatusCode::NOT_FOUND,
                self.route_prefix.clone(),
                "Resource not found.",
            ));
            record(&outcome);
            return outcome;
        };

        let span = tracing::info_span!("operation", operation = %operation, method = %request.method);
        let outcome: Outcome = async {
            match operation {
                Operation::Create => create::handle(&self.actions, request).await,
                Operation::Delete => delete::handle(&self.actions, request).await,
                Operation::Move => move_entry::handle(&self.actions, request).await,
                Operation::Edit => edit::handle(&self.actions, request).await,
                Operation::Save => save::handle(&self.actions, request).await,
                Operation::DirSnapshot => dir_snapshot::handle(&self.actions, request).await,
                Operation::Exists => exists::handle(&self.actions, request).await,
                Operation::Upload => self.upload.handle(request).await,
            }
        }
        .instrument(span)
        .await
        .into();

        match &outcome {
            Outcome::Success(success) => {
                tracing::debug!(operation = %operation, status = %success.status, "Operation succeeded")
            }
            Outcome::Failure(failure) if failure.status.is_server_error() => {
                tracing::error!(operation = %operation, code = %failure.code, status = %failure.status, "Operation failed")
            }
            Outcome::Failure(failure) => {
                tracing::info!(operation = %operation, code = %failure.code, status = %failure.status, "Operation rejected")
            }
        }
        record(&outcome);
        outcome
    }
}

fn record(outcome: &Outcome) {
    let code = outcome.code().map(|code| code.as_str()).unwrap_or("success");
    metrics::counter!(
        "devfs_operations_total",
        "operation" => outcome.operation().to_string(),
        "outcome" => code
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::LocalStorageProvider;
    use axum::http::Method;
    use tempfile::TempDir;

    fn dispatcher(root: &TempDir, staging: &TempDir) -> Dispatcher {
        Dispatcher::new(
            DispatcherSettings {
                root: root.path().to_path_buf(),
                staging_dir: staging.path().to_path_buf(),
                route_prefix: "/client-dev-interface/".to_string(),
            },
            Arc::new(LocalStorageProvider::new()),
        )
    }

    #[tokio::test]
    async fn test_unknown_operation_is_enores() {
        let (root, staging) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let dispatcher = dispatcher(&root, &staging);

        for target in ["/client-dev-interface/rename", "/client-dev-interface", "/other/create"] {
            let outcome = dispatcher
                .dispatch(&OperationRequest::new(Method::GET, target))
                .await;
            assert_eq!(outcome.code(), Some(ErrorCode::Enores), "{target}");
            assert_eq!(outcome.status(), StatusCode::NOT_FOUND);
            assert_eq!(outcome.operation(), "client-dev-interface");
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_segment() {
        let (root, staging) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        std::fs::write(root.path().join("a.txt"), b"x").unwrap();
        let dispatcher = dispatcher(&root, &staging);

        let outcome = dispatcher
            .dispatch(
                &OperationRequest::new(Method::GET, "/client-dev-interface/exists/ignored")
                    .with_query_param("Filepath", "/a.txt"),
            )
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.operation(), "exists");
    }

    #[tokio::test]
    async fn test_wrong_method_is_emet_for_known_operation() {
        let (root, staging) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let dispatcher = dispatcher(&root, &staging);

        let outcome = dispatcher
            .dispatch(&OperationRequest::new(Method::GET, "/client-dev-interface/upload"))
            .await;

        assert_eq!(outcome.code(), Some(ErrorCode::Emet));
        assert_eq!(outcome.headers()[axum::http::header::ALLOW], "PUT");
    }
}
