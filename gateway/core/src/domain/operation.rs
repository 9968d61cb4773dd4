// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Gateway operation table
//!
//! The set of operations is closed: adding one means adding a variant here
//! and a match arm in the dispatcher.

use axum::http::Method;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Delete,
    Move,
    /// Read a file's contents ("edit" on the wire)
    Edit,
    /// Overwrite or create a file with the request body ("save" on the wire)
    Save,
    /// List the direct children of a directory
    DirSnapshot,
    Exists,
    Upload,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Create,
        Operation::Delete,
        Operation::Move,
        Operation::Edit,
        Operation::Save,
        Operation::DirSnapshot,
        Operation::Exists,
        Operation::Upload,
    ];

    /// Wire name, also used as the Outcome operation tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Move => "move",
            Operation::Edit => "edit",
            Operation::Save => "save",
            Operation::DirSnapshot => "dir-snapshot",
            Operation::Exists => "exists",
            Operation::Upload => "upload",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operation| operation.as_str() == name)
    }

    /// The only HTTP verb this operation accepts
    pub fn method(&self) -> Method {
        match self {
            Operation::Create | Operation::Save | Operation::Upload => Method::PUT,
            Operation::Delete => Method::DELETE,
            Operation::Move => Method::PATCH,
            Operation::Edit | Operation::DirSnapshot | Operation::Exists => Method::GET,
        }
    }

    /// Extract the operation from a request target path.
    ///
    /// The operation name is the segment right after `/<prefix>/`. Anything
    /// following that segment is ignored; an absent or unknown segment yields
    /// `None`.
    pub fn from_target(path: &str, prefix: &str) -> Option<Self> {
        let prefix = prefix.trim_matches('/');
        let rest = path.trim_start_matches('/').strip_prefix(prefix)?;
        let rest = rest.strip_prefix('/')?;
        let segment = rest.split('/').next()?;
        Self::from_name(segment)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
