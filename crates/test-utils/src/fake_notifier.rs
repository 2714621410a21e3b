use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use watchrun::errors::{Result, WatchrunError};
use watchrun::watch::{Notifier, NotifyStream, WatchEvent};

#[derive(Debug, Default)]
struct Shared {
    events: Option<mpsc::UnboundedSender<WatchEvent>>,
    errors: Option<mpsc::UnboundedSender<notify::Error>>,
    registered: Vec<PathBuf>,
}

/// A fake notifier that records `add` calls instead of watching anything.
/// Events and errors are injected through the paired
/// [`FakeNotifierController`].
#[derive(Debug)]
pub struct FakeNotifier {
    shared: Arc<Mutex<Shared>>,
}

/// Test-side control for a [`FakeNotifier`].
#[derive(Debug, Clone)]
pub struct FakeNotifierController {
    shared: Arc<Mutex<Shared>>,
}

/// Build a fake notifier, the stream the engine reads from, and the
/// controller tests use to drive it.
pub fn fake_notifier() -> (FakeNotifier, NotifyStream, FakeNotifierController) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (error_tx, error_rx) = mpsc::unbounded_channel();

    let shared = Arc::new(Mutex::new(Shared {
        events: Some(event_tx),
        errors: Some(error_tx),
        registered: Vec::new(),
    }));

    (
        FakeNotifier {
            shared: Arc::clone(&shared),
        },
        NotifyStream::new(event_rx, error_rx),
        FakeNotifierController { shared },
    )
}

impl Notifier for FakeNotifier {
    fn add(&mut self, path: &Path) -> Result<()> {
        let mut shared = self.shared.lock().unwrap();
        if shared.events.is_none() {
            return Err(WatchrunError::WatcherClosed);
        }
        shared.registered.push(path.to_path_buf());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut shared = self.shared.lock().unwrap();
        shared.events = None;
        shared.errors = None;
        Ok(())
    }
}

impl FakeNotifierController {
    /// Deliver an event. Returns false once the notifier is closed.
    pub fn send(&self, event: WatchEvent) -> bool {
        let shared = self.shared.lock().unwrap();
        match &shared.events {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Deliver a subscription error.
    pub fn send_error(&self, message: &str) -> bool {
        let shared = self.shared.lock().unwrap();
        match &shared.errors {
            Some(tx) => tx.send(notify::Error::generic(message)).is_ok(),
            None => false,
        }
    }

    /// Every path passed to `add`, in call order.
    pub fn registered(&self) -> Vec<PathBuf> {
        self.shared.lock().unwrap().registered.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().unwrap().events.is_none()
    }
}
