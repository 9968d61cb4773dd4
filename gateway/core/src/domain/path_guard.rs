// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Path Guard Domain Service
//!
//! Containment check that keeps every gateway operation inside the configured
//! root directory. This is a domain service (not infrastructure) because the
//! boundary is a core rule of the gateway, not a technical concern of storage.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Decide whether a client-influenced path stays under the root

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Maximum accepted length of a client-supplied path, in bytes
pub const MAX_PATH_LEN: usize = 4096;

/// Returns true iff `candidate` lies inside `root` (or is `root` itself).
///
/// Both paths are made absolute against the working directory and normalized
/// lexically before comparison, and a single trailing separator is appended to
/// each so a sibling such as `/root2` never matches `/root`. Never fails: any
/// path that cannot be resolved is reported as not contained.
///
/// # Examples
/// ```
/// use devfs_core::domain::path_guard::is_contained;
///
/// assert!(is_contained("/srv/root/a/b.txt", "/srv/root"));
/// assert!(!is_contained("/srv/root/../other", "/srv/root"));
/// assert!(!is_contained("/srv/root2", "/srv/root"));
/// ```
pub fn is_contained(candidate: impl AsRef<Path>, root: impl AsRef<Path>) -> bool {
    let (Some(candidate), Some(root)) = (resolve(candidate.as_ref()), resolve(root.as_ref()))
    else {
        return false;
    };

    with_trailing_separator(&candidate).starts_with(&with_trailing_separator(&root))
}

/// Make `path` absolute and strip `.`/`..` components without touching the filesystem
pub fn resolve(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                // popping at the filesystem root leaves the root in place
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    Some(normalized)
}

fn with_trailing_separator(path: &Path) -> String {
    let mut text = path.to_string_lossy().into_owned();
    while text.ends_with(MAIN_SEPARATOR) && text.len() > 1 {
        text.pop();
    }
    if !text.ends_with(MAIN_SEPARATOR) {
        text.push(MAIN_SEPARATOR);
    }
    text
}

/// Root-bound path resolver used by every action handler
///
/// Joins client paths onto the configured root and hands back the resolved
/// target only when it stays inside the root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
    max_path_len: usize,
}

impl PathGuard {
    /// Create a guard for `root`. The root is normalized once here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = resolve(&root).unwrap_or(root);
        Self {
            root,
            max_path_len: MAX_PATH_LEN,
        }
    }

    /// Create a guard with a custom maximum client path length
    pub fn with_max_length(root: impl Into<PathBuf>, max_path_len: usize) -> Self {
        Self {
            max_path_len,
            ..Self::new(root)
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied path against the root.
    ///
    /// `"/a/b"` and `"a/b"` both address `root/a/b`. Returns `None` when the
    /// path is too long, contains a NUL byte, or escapes the root.
    pub fn resolve(&self, supplied: &str) -> Option<PathBuf> {
        if supplied.len() > self.max_path_len {
            tracing::warn!(len = supplied.len(), "Rejected over-long path");
            return None;
        }
        if supplied.contains('\0') {
            tracing::warn!(path = %supplied.escape_default(), "Rejected path containing NUL byte");
            return None;
        }

        let joined = self.root.join(supplied.trim_start_matches(['/', '\\']));
        if !is_contained(&joined, &self.root) {
            tracing::warn!(
                path = %supplied,
                root = %self.root.display(),
                "Path outside gateway root detected"
            );
            return None;
        }
        resolve(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_is_contained() {
        assert!(is_contained("/workspace/file.txt", "/workspace"));
        assert!(is_contained("/workspace/a/b/c", "/workspace/"));
    }

    #[test]
    fn test_root_contains_itself() {
        assert!(is_contained("/workspace", "/workspace"));
        assert!(is_contained("/workspace/", "/workspace"));
        assert!(is_contained("/workspace/.", "/workspace"));
    }

    #[test]
    fn test_parent_traversal_escapes() {
        assert!(!is_contained("/root/../other", "/root"));
        assert!(!is_contained("/workspace/a/../../etc/passwd", "/workspace"));
    }

    #[test]
    fn test_traversal_that_stays_inside() {
        assert!(is_contained("/workspace/a/../b", "/workspace"));
        assert!(is_contained("/workspace/./a/./b/..", "/workspace"));
    }

    #[test]
    fn test_partial_segment_collision() {
        assert!(!is_contained("/root2", "/root"));
        assert!(!is_contained("/root2/file", "/root"));
        assert!(!is_contained("/rootfile", "/root"));
    }

    #[test]
    fn test_parent_of_filesystem_root() {
        assert!(is_contained("/../../", "/"));
        assert!(!is_contained("/../../etc", "/srv"));
    }

    #[test]
    fn test_relative_paths_resolve_against_cwd() {
        assert!(is_contained("./a/b", "."));
        assert!(!is_contained("../outside", "."));
    }

    #[test]
    fn test_empty_candidate_is_not_contained() {
        assert!(!is_contained("", "/workspace"));
    }

    #[test]
    fn test_guard_resolves_absolute_and_relative_forms() {
        let guard = PathGuard::new("/workspace");
        assert_eq!(guard.resolve("/a/b.txt"), Some(PathBuf::from("/workspace/a/b.txt")));
        assert_eq!(guard.resolve("a/b.txt"), Some(PathBuf::from("/workspace/a/b.txt")));
        assert_eq!(guard.resolve("/"), Some(PathBuf::from("/workspace")));
    }

    #[test]
    fn test_guard_rejects_escape() {
        let guard = PathGuard::new("/workspace");
        assert_eq!(guard.resolve("/../b"), None);
        assert_eq!(guard.resolve("a/../../b"), None);
        assert_eq!(guard.resolve("//../etc"), None);
    }

    #[test]
    fn test_guard_normalizes_inner_segments() {
        let guard = PathGuard::new("/workspace/");
        assert_eq!(
            guard.resolve("/a/./b/../c"),
            Some(PathBuf::from("/workspace/a/c"))
        );
    }

    #[test]
    fn test_guard_rejects_nul_and_long_paths() {
        let guard = PathGuard::with_max_length("/workspace", 10);
        assert_eq!(guard.resolve("/a\0b"), None);
        assert_eq!(guard.resolve("/very/long/path/over/limit"), None);
    }
}
