// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod actions;
pub mod dispatcher;
pub mod upload;

// Re-export services for convenience
pub use dispatcher::{Dispatcher, DispatcherSettings};
pub use upload::UploadService;
