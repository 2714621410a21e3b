// src/watch/index.rs

//! Directory discovery.
//!
//! Used at startup on the configured root and again whenever a directory is
//! created (or moved in) under a watched directory.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{Result, WatchrunError};

/// Return every directory at or below `path`, in traversal order.
///
/// `path` itself is included when it is a directory; a regular file yields an
/// empty list. Symlinks are not followed. The first traversal error aborts
/// the whole walk.
pub fn discover_directories(path: &Path) -> Result<Vec<PathBuf>> {
    let mut directories = Vec::new();

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(|source| WatchrunError::Discovery {
            path: path.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            directories.push(entry.into_path());
        }
    }

    debug!(root = ?path, count = directories.len(), "directory walk finished");
    Ok(directories)
}
