// src/engine/target.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::RegistrationId;

/// The watched tree: its root and every directory registered so far.
///
/// Only grows. Directories removed from disk stay registered as stale
/// entries.
#[derive(Debug)]
pub struct WatchTarget {
    root: PathBuf,
    registered: HashMap<PathBuf, RegistrationId>,
    next_id: u64,
}

impl WatchTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            registered: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.registered.contains_key(path)
    }

    /// Record `path` as registered. Returns `None` if it already was.
    pub fn insert(&mut self, path: PathBuf) -> Option<RegistrationId> {
        if self.registered.contains_key(&path) {
            return None;
        }
        let id = RegistrationId(self.next_id);
        self.next_id += 1;
        self.registered.insert(path, id);
        Some(id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }
}
