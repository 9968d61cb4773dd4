// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! devfs gateway core
//!
//! Filesystem gateway that lets a browser-based development client manage a
//! single rooted directory over HTTP: create, delete, move, read, write, list
//! and check entries, and commit multi-file uploads.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Routing, path containment and action execution

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
