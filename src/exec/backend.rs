// src/exec/backend.rs

//! Pluggable process-spawning backend.
//!
//! The [`ProcessRunner`](super::ProcessRunner) talks to a `ProcessSpawner`
//! instead of `tokio::process` directly. This makes it easy to swap in a fake
//! spawner in tests while keeping the production implementation here.
//!
//! - `CommandSpawner` is the default implementation used by `watchrun`. It
//!   starts each command as the leader of a new process group and kills the
//!   whole group with `SIGKILL`.
//! - Tests can provide their own `ProcessSpawner` that, for example, records
//!   spawns and kills without touching the OS.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::errors::{Result, WatchrunError};

use super::runner::RunSpec;

/// A child started by a [`ProcessSpawner`]: its pid, the process group it
/// leads, and whatever the backend needs to terminate it later.
#[derive(Debug)]
pub struct Spawned<C> {
    pub pid: u32,
    pub pgid: i32,
    pub child: C,
}

/// Trait abstracting how commands are started and stopped.
///
/// Production code uses [`CommandSpawner`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ProcessSpawner: Send + Sync {
    type Child: Send;

    /// Start `spec` as the leader of a new process group, with inherited
    /// standard streams.
    fn spawn_group(&self, spec: &RunSpec) -> Result<Spawned<Self::Child>>;

    /// Send a termination signal to the whole process group of `spawned`.
    ///
    /// A group that no longer exists is an error; the caller decides what
    /// that means.
    fn kill_group<'a>(
        &'a self,
        spec: &'a RunSpec,
        spawned: &'a mut Spawned<Self::Child>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Real spawner used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandSpawner;

impl ProcessSpawner for CommandSpawner {
    type Child = Child;

    fn spawn_group(&self, spec: &RunSpec) -> Result<Spawned<Child>> {
        let (program, args) = spec.argv().split_first().ok_or(WatchrunError::EmptyCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(spec.dir())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .process_group(0)
            .kill_on_drop(false);

        let child = cmd.spawn().map_err(|source| WatchrunError::Spawn {
            argv: spec.argv().to_vec(),
            source,
        })?;

        // Not reaped until `kill_group`, so the id is always present here.
        let pid = child.id().ok_or_else(|| WatchrunError::Spawn {
            argv: spec.argv().to_vec(),
            source: std::io::Error::other("child exited before its pid was read"),
        })?;

        Ok(Spawned {
            pid,
            pgid: pid as i32,
            child,
        })
    }

    fn kill_group<'a>(
        &'a self,
        spec: &'a RunSpec,
        spawned: &'a mut Spawned<Child>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            killpg(Pid::from_raw(spawned.pgid), Signal::SIGKILL).map_err(|errno| {
                WatchrunError::Kill {
                    pgid: spawned.pgid,
                    argv: spec.argv().to_vec(),
                    source: std::io::Error::from(errno),
                }
            })?;

            // Reap the leader so killed commands don't linger as zombies.
            match spawned.child.wait().await {
                Ok(status) => debug!(pid = spawned.pid, %status, "process group leader reaped"),
                Err(err) => warn!(pid = spawned.pid, error = %err, "failed to reap killed process"),
            }
            Ok(())
        })
    }
}
