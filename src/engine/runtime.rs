// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::anyhow;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::{Result, WatchrunError};
use crate::exec::{ProcessRunner, ProcessSpawner};
use crate::types::EngineState;
use crate::watch::{discover_directories, FilterSpec, Notifier, NotifyStream, Occurrence, WatchEvent};

use super::core::{classify, EngineAction};
use super::target::WatchTarget;

/// Bridges filesystem notifications to directory discovery and to the
/// [`ProcessRunner`].
///
/// `start` consumes the engine and drives it through
/// `Idle -> Discovering -> Running -> Stopped`, processing one event at a
/// time in delivery order. The paired [`EngineHandle`] stops it from any
/// other task.
pub struct WatchEngine<N: Notifier, S: ProcessSpawner> {
    target: WatchTarget,
    filter: FilterSpec,
    stream: NotifyStream,
    notifier: Arc<Mutex<N>>,
    runner: Arc<ProcessRunner<S>>,
    state_tx: watch::Sender<EngineState>,
}

impl<N: Notifier, S: ProcessSpawner> fmt::Debug for WatchEngine<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchEngine")
            .field("target", &self.target)
            .field("filter", &self.filter)
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl<N: Notifier, S: ProcessSpawner> WatchEngine<N, S> {
    pub fn new(
        root: impl Into<PathBuf>,
        filter: FilterSpec,
        notifier: N,
        stream: NotifyStream,
        runner: ProcessRunner<S>,
    ) -> (Self, EngineHandle<N, S>) {
        let (state_tx, state_rx) = watch::channel(EngineState::Idle);
        let notifier = Arc::new(Mutex::new(notifier));
        let runner = Arc::new(runner);

        let handle = EngineHandle {
            notifier: Arc::clone(&notifier),
            runner: Arc::clone(&runner),
            state_rx,
        };

        let engine = Self {
            target: WatchTarget::new(root),
            filter,
            stream,
            notifier,
            runner,
            state_tx,
        };

        (engine, handle)
    }

    /// Discover and register the tree, run the command once, then process
    /// events until the subscription closes or something fails.
    ///
    /// Returns `Ok(())` when the loop ends because the subscription was
    /// closed (normally via [`EngineHandle::stop`]).
    pub async fn start(mut self) -> Result<()> {
        let result = self.discover_and_watch().await;

        if let Err(err) = &result {
            warn!(error = %err, "watch loop terminated with an error");
            let closed = lock_notifier(&self.notifier).close();
            if let Err(close_err) = closed {
                debug!(error = %close_err, "closing watcher after failure");
            }
        }

        // A write handled while `stop` was in flight may have started a new
        // instance after the handle's kill; don't let it outlive the engine.
        let stop_result = self.runner.stop().await;
        self.set_state(EngineState::Stopped);

        result?;
        stop_result
    }

    async fn discover_and_watch(&mut self) -> Result<()> {
        self.set_state(EngineState::Discovering);

        let root = self.target.root().to_path_buf();
        info!(root = ?root, "discovering sub directories");
        let directories = discover_directories(&root)?;

        info!(count = directories.len(), "adding directories to watch");
        self.register_all(directories)?;

        self.runner.run().await?;

        self.set_state(EngineState::Running);
        info!("starting watching for changes");
        self.event_loop().await
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            match self.stream.next().await {
                Occurrence::Event(event) => self.handle_event(event).await?,
                Occurrence::Error(err) => return Err(WatchrunError::Subscription(err)),
                Occurrence::Closed => {
                    info!("watcher closed; leaving event loop");
                    return Ok(());
                }
            }
        }
    }

    async fn handle_event(&mut self, event: WatchEvent) -> Result<()> {
        debug!(?event, "received watch event");

        match classify(self.target.root(), &self.filter, &event) {
            EngineAction::DiscoverSubtree(path) => {
                let found = discover_directories(&path)?;
                if !found.is_empty() {
                    info!(directories = ?found, "found new directories");
                }
                self.register_all(found)?;
            }
            EngineAction::Rerun => {
                debug!(path = ?event.path, "qualifying write; re-running command");
                self.runner.run().await?;
            }
            EngineAction::Skip(reason) => {
                debug!(path = ?event.path, ?reason, "event skipped");
            }
        }
        Ok(())
    }

    /// Register each directory not seen before with the notifier.
    fn register_all(&mut self, directories: Vec<PathBuf>) -> Result<()> {
        let mut notifier = lock_notifier(&self.notifier);

        for dir in directories {
            if self.target.contains(&dir) {
                debug!(dir = ?dir, "directory already registered");
                continue;
            }
            notifier.add(&dir)?;
            if let Some(id) = self.target.insert(dir) {
                debug!(id = id.0, total = self.target.registered_count(), "directory registered");
            }
        }
        Ok(())
    }

    fn set_state(&self, state: EngineState) {
        debug!(%state, "engine state changed");
        self.state_tx.send_replace(state);
    }
}

/// Cloneable control handle for a [`WatchEngine`] running on another task.
pub struct EngineHandle<N: Notifier, S: ProcessSpawner> {
    notifier: Arc<Mutex<N>>,
    runner: Arc<ProcessRunner<S>>,
    state_rx: watch::Receiver<EngineState>,
}

impl<N: Notifier, S: ProcessSpawner> Clone for EngineHandle<N, S> {
    fn clone(&self) -> Self {
        Self {
            notifier: Arc::clone(&self.notifier),
            runner: Arc::clone(&self.runner),
            state_rx: self.state_rx.clone(),
        }
    }
}

impl<N: Notifier, S: ProcessSpawner> fmt::Debug for EngineHandle<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("state", &*self.state_rx.borrow())
            .finish_non_exhaustive()
    }
}

impl<N: Notifier, S: ProcessSpawner> EngineHandle<N, S> {
    /// Close the notification subscription (which ends the event loop) and
    /// kill the command's process group.
    pub async fn stop(&self) -> Result<()> {
        info!("stopping watch engine");
        {
            let mut notifier = lock_notifier(&self.notifier);
            notifier.close()?;
        }
        self.runner.stop().await
    }

    pub fn state(&self) -> EngineState {
        *self.state_rx.borrow()
    }

    /// Wait until the engine reaches `target`, or `Stopped` if it ends
    /// first. Returns the state actually reached.
    pub async fn wait_for_state(&self, target: EngineState) -> Result<EngineState> {
        let mut rx = self.state_rx.clone();
        let reached = rx
            .wait_for(|state| *state == target || *state == EngineState::Stopped)
            .await
            .map_err(|_| WatchrunError::Other(anyhow!("engine dropped before reaching {target}")))?;
        Ok(*reached)
    }

    pub fn runner(&self) -> &ProcessRunner<S> {
        &self.runner
    }
}

fn lock_notifier<N>(notifier: &Mutex<N>) -> std::sync::MutexGuard<'_, N> {
    notifier.lock().unwrap_or_else(PoisonError::into_inner)
}
