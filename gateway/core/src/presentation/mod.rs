// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`devfs-gateway-core`)
//!
//! HTTP surface that translates requests into [`OperationRequest`]s and
//! [`Outcome`]s back into responses. No filesystem logic lives here; all real
//! work is delegated to the [`Dispatcher`].
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Axum router, request decoding and response rendering |
//! | [`staging`] | Streams multipart upload parts into the staging directory |
//!
//! [`OperationRequest`]: crate::domain::request::OperationRequest
//! [`Outcome`]: crate::domain::outcome::Outcome
//! [`Dispatcher`]: crate::application::dispatcher::Dispatcher

pub mod api;
pub mod staging;
