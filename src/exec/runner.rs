// src/exec/runner.rs

//! Exclusive lifecycle of the watched command.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::{Result, WatchrunError};

use super::backend::{ProcessSpawner, Spawned};

/// What to run and where. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    argv: Vec<String>,
    dir: PathBuf,
}

impl RunSpec {
    /// `argv` is the program followed by its arguments. It may be empty;
    /// that is only reported when the command is first run.
    pub fn new(argv: Vec<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            dir: dir.into(),
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Mutable bookkeeping for the current child, guarded by the runner's lock.
struct RunState<C> {
    live: Option<Spawned<C>>,
}

/// Runs one command, keeping at most one instance of it alive.
///
/// Every `run` terminates the previous instance's whole process group
/// before starting a new one. The kill, spawn and bookkeeping all happen
/// under a single lock, so concurrent `run` calls are fully serialized and
/// two instances are never live at once.
pub struct ProcessRunner<S: ProcessSpawner> {
    spec: RunSpec,
    spawner: S,
    state: Mutex<RunState<S::Child>>,
}

impl<S: ProcessSpawner> fmt::Debug for ProcessRunner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRunner")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl<S: ProcessSpawner> ProcessRunner<S> {
    pub fn new(spec: RunSpec, spawner: S) -> Self {
        Self {
            spec,
            spawner,
            state: Mutex::new(RunState { live: None }),
        }
    }

    /// (Re)start the command.
    ///
    /// If an instance is recorded, its process group is killed first; a
    /// failed kill is returned as-is and no new instance is started (the old
    /// record is kept, since it is unknown whether that group is gone).
    pub async fn run(&self) -> Result<()> {
        if self.spec.argv.is_empty() {
            return Err(WatchrunError::EmptyCommand);
        }

        let mut state = self.state.lock().await;

        if let Some(live) = state.live.as_mut() {
            info!(argv = ?self.spec.argv, pgid = live.pgid, "killing current execution");
            self.spawner.kill_group(&self.spec, live).await?;
            state.live = None;
        }

        info!(argv = ?self.spec.argv, dir = ?self.spec.dir, "executing");
        let spawned = self.spawner.spawn_group(&self.spec)?;
        debug!(pid = spawned.pid, pgid = spawned.pgid, "command started");
        state.live = Some(spawned);

        Ok(())
    }

    /// Kill the current instance, if any. Without one this is a no-op, so
    /// repeated calls succeed.
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        if let Some(live) = state.live.as_mut() {
            info!(argv = ?self.spec.argv, pgid = live.pgid, "killing current execution");
            self.spawner.kill_group(&self.spec, live).await?;
            state.live = None;
        }
        Ok(())
    }

    /// Whether an instance is currently recorded as live.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.live.is_some()
    }

    /// Pid of the recorded instance, if any.
    pub async fn current_pid(&self) -> Option<u32> {
        self.state.lock().await.live.as_ref().map(|live| live.pid)
    }
}
