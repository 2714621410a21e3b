// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(slash_string(rel));
    }

    // macOS reports /private/var/... for paths registered as /var/...
    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(slash_string(rel));
        }
    }

    None
}

/// String form of `path` suitable for glob matching: relative to `root`
/// when possible, otherwise the full path. Always uses forward slashes.
pub fn match_str(root: &Path, path: &Path) -> String {
    relative_str(root, path).unwrap_or_else(|| slash_string(path))
}

fn slash_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
