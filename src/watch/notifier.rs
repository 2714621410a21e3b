// src/watch/notifier.rs

use std::path::Path;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::debug;

use crate::errors::{Result, WatchrunError};
use crate::watch::event::{NotifyStream, WatchEvent};

/// Registration side of a notification subscription.
///
/// Events for registered directories arrive on the [`NotifyStream`] created
/// alongside the notifier. Directories are registered one by one; recursion
/// is the engine's job.
pub trait Notifier: Send {
    /// Start watching `path` (non-recursively).
    fn add(&mut self, path: &Path) -> Result<()>;

    /// Terminate the subscription. The paired stream reports `Closed` once
    /// all pending events are drained. Closing twice is not an error.
    fn close(&mut self) -> Result<()>;
}

/// [`Notifier`] backed by the platform's recommended `notify` watcher.
pub struct NotifyWatcher {
    inner: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for NotifyWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyWatcher")
            .field("closed", &self.inner.is_none())
            .finish()
    }
}

impl NotifyWatcher {
    /// Create the watcher and the stream its events are delivered on.
    pub fn new() -> Result<(Self, NotifyStream)> {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<WatchEvent>();
        let (error_tx, error_rx) = mpsc::unbounded_channel::<notify::Error>();

        // Called synchronously on notify's own thread. The senders live in
        // this closure, so dropping the watcher closes both channels.
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    for watch_event in WatchEvent::from_notify(event) {
                        if event_tx.send(watch_event).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    let _ = error_tx.send(err);
                }
            },
            Config::default(),
        )
        .map_err(|e| WatchrunError::Other(anyhow::Error::new(e).context("creating file watcher")))?;

        Ok((
            Self {
                inner: Some(watcher),
            },
            NotifyStream::new(event_rx, error_rx),
        ))
    }
}

impl Notifier for NotifyWatcher {
    fn add(&mut self, path: &Path) -> Result<()> {
        let watcher = self.inner.as_mut().ok_or(WatchrunError::WatcherClosed)?;
        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchrunError::Register {
                path: path.to_path_buf(),
                source,
            })
    }

    fn close(&mut self) -> Result<()> {
        if self.inner.take().is_some() {
            debug!("file watcher closed");
        }
        Ok(())
    }
}
