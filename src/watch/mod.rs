// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Discovering every directory under a path ([`index`]).
//! - Compiling `watch` / `ignore` glob patterns ([`patterns`]).
//! - Wiring up a filesystem notifier (`notify`) and turning its callbacks
//!   into a stream of [`WatchEvent`]s ([`notifier`], [`event`]).
//!
//! It does **not** know about the command being run; the engine decides
//! what an event means.

pub mod event;
pub mod index;
pub mod notifier;
pub mod path_utils;
pub mod patterns;

pub use event::{NotifyStream, Occurrence, WatchEvent, WatchEventKind};
pub use index::discover_directories;
pub use notifier::{Notifier, NotifyWatcher};
pub use patterns::FilterSpec;
