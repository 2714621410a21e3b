// src/engine/mod.rs

//! Watch engine for watchrun.
//!
//! This module ties together:
//! - directory discovery and registration (the [`WatchTarget`])
//! - event classification (pure, in [`core`])
//! - the async event loop and its stop handle (in [`runtime`])
//!
//! The loop reacts to:
//!   - directory creation: discover and register the new subtree
//!   - qualifying writes: restart the command
//!   - subscription errors: terminate with an error
//!   - subscription closure: terminate cleanly

pub mod core;
pub mod runtime;
pub mod target;

pub use self::core::{classify, EngineAction, SkipReason};
pub use runtime::{EngineHandle, WatchEngine};
pub use target::WatchTarget;
pub use crate::types::EngineState;
