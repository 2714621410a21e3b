// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] owns the lifecycle of the watched command: at most one live
//!   instance, and every restart kills the previous process group first.
//! - [`backend`] provides the `ProcessSpawner` trait and the concrete
//!   `CommandSpawner` (`tokio::process` + `killpg`) used in production,
//!   which tests can replace with a fake implementation.

pub mod backend;
pub mod runner;

pub use backend::{CommandSpawner, ProcessSpawner, Spawned};
pub use runner::{ProcessRunner, RunSpec};
