// src/engine/core.rs

//! Pure event classification.
//!
//! Decides what a single [`WatchEvent`] means for the engine without doing
//! any IO: the async shell in [`runtime`](super::runtime) performs the
//! resulting [`EngineAction`].

use std::path::{Path, PathBuf};

use crate::watch::path_utils::match_str;
use crate::watch::{FilterSpec, WatchEvent, WatchEventKind};

/// What the engine should do in response to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// Something appeared at this path: walk it and register any
    /// directories found. Never re-runs the command by itself.
    DiscoverSubtree(PathBuf),
    /// A qualifying write: re-run the command.
    Rerun,
    /// Nothing to do.
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Event kind the engine does not react to.
    Irrelevant,
    /// Write rejected by the watch/ignore filter.
    Filtered,
}

/// Classify `event` for an engine watching `root` with `filter`.
pub fn classify(root: &Path, filter: &FilterSpec, event: &WatchEvent) -> EngineAction {
    match event.kind {
        WatchEventKind::Created => EngineAction::DiscoverSubtree(event.path.clone()),
        WatchEventKind::Written => {
            let rel = match_str(root, &event.path);
            let file_name = event.path.file_name().and_then(|n| n.to_str());
            if filter.matches(&rel, file_name) {
                EngineAction::Rerun
            } else {
                EngineAction::Skip(SkipReason::Filtered)
            }
        }
        WatchEventKind::Other => EngineAction::Skip(SkipReason::Irrelevant),
    }
}
