// src/watch/event.rs

//! Watch events and the stream the engine reads them from.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::EventKind;
use tokio::sync::mpsc;

/// What happened to a path, as far as the engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// A path appeared: created, or renamed/moved into a watched directory.
    Created,
    /// File contents were written.
    Written,
    /// Anything else (removal, metadata, access, rename-from, ...).
    Other,
}

/// A single path-level notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
}

impl WatchEvent {
    pub fn new(path: impl Into<PathBuf>, kind: WatchEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(path, WatchEventKind::Created)
    }

    pub fn written(path: impl Into<PathBuf>) -> Self {
        Self::new(path, WatchEventKind::Written)
    }

    /// Split a `notify` event into one `WatchEvent` per path, keeping the
    /// backend's path order.
    ///
    /// For `Modify(Name(Both))` the first path is the old name and the
    /// second the new one; only the new name counts as created.
    pub fn from_notify(event: notify::Event) -> Vec<WatchEvent> {
        match event.kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
                .paths
                .into_iter()
                .enumerate()
                .map(|(idx, path)| {
                    let kind = if idx == 1 {
                        WatchEventKind::Created
                    } else {
                        WatchEventKind::Other
                    };
                    WatchEvent::new(path, kind)
                })
                .collect(),
            kind => {
                let kind = WatchEventKind::from(kind);
                event
                    .paths
                    .into_iter()
                    .map(|path| WatchEvent::new(path, kind))
                    .collect()
            }
        }
    }
}

impl From<EventKind> for WatchEventKind {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Create(_) => Self::Created,
            EventKind::Modify(modify_kind) => match modify_kind {
                ModifyKind::Name(RenameMode::To) => Self::Created,
                ModifyKind::Data(_) | ModifyKind::Any => Self::Written,
                _ => Self::Other,
            },
            _ => Self::Other,
        }
    }
}

/// Result of waiting on a [`NotifyStream`].
#[derive(Debug)]
pub enum Occurrence {
    Event(WatchEvent),
    Error(notify::Error),
    /// The subscription was closed; no more events will arrive.
    Closed,
}

/// Receiving side of a notification subscription: a stream of events plus a
/// parallel stream of delivery errors.
///
/// Both senders belong to the notifier; closing the notifier drops them and
/// the stream reports [`Occurrence::Closed`].
#[derive(Debug)]
pub struct NotifyStream {
    events: mpsc::UnboundedReceiver<WatchEvent>,
    errors: mpsc::UnboundedReceiver<notify::Error>,
}

impl NotifyStream {
    pub fn new(
        events: mpsc::UnboundedReceiver<WatchEvent>,
        errors: mpsc::UnboundedReceiver<notify::Error>,
    ) -> Self {
        Self { events, errors }
    }

    /// Wait for the next event, error or closure.
    ///
    /// A closed error channel is treated as a clean shutdown, not an error.
    pub async fn next(&mut self) -> Occurrence {
        tokio::select! {
            biased;
            event = self.events.recv() => match event {
                Some(event) => Occurrence::Event(event),
                None => Occurrence::Closed,
            },
            err = self.errors.recv() => match err {
                Some(err) => Occurrence::Error(err),
                None => Occurrence::Closed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};

    #[test]
    fn classifies_notify_kinds() {
        assert_eq!(
            WatchEventKind::from(EventKind::Create(CreateKind::Folder)),
            WatchEventKind::Created
        );
        assert_eq!(
            WatchEventKind::from(EventKind::Modify(ModifyKind::Data(DataChange::Any))),
            WatchEventKind::Written
        );
        assert_eq!(
            WatchEventKind::from(EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            WatchEventKind::Created
        );
        assert_eq!(
            WatchEventKind::from(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))),
            WatchEventKind::Other
        );
        assert_eq!(
            WatchEventKind::from(EventKind::Remove(RemoveKind::File)),
            WatchEventKind::Other
        );
    }

    #[test]
    fn rename_both_only_creates_the_new_name() {
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("/w/old"))
            .add_path(PathBuf::from("/w/new"));

        let events = WatchEvent::from_notify(event);
        assert_eq!(
            events,
            vec![
                WatchEvent::new("/w/old", WatchEventKind::Other),
                WatchEvent::created("/w/new"),
            ]
        );
    }

    #[tokio::test]
    async fn closed_channels_end_the_stream() {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        let mut stream = NotifyStream::new(event_rx, error_rx);

        event_tx.send(WatchEvent::written("/w/a.txt")).unwrap();
        match stream.next().await {
            Occurrence::Event(ev) => assert_eq!(ev, WatchEvent::written("/w/a.txt")),
            other => panic!("expected event, got {other:?}"),
        }

        error_tx.send(notify::Error::generic("backend hiccup")).unwrap();
        assert!(matches!(stream.next().await, Occurrence::Error(_)));

        drop(event_tx);
        drop(error_tx);
        assert!(matches!(stream.next().await, Occurrence::Closed));
    }
}
