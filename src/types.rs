use std::fmt;

/// Lifecycle of a single [`WatchEngine`](crate::engine::WatchEngine).
///
/// - `Idle`: constructed, `start` not called yet.
/// - `Discovering`: walking the root and registering directories.
/// - `Running`: initial command executed, event loop active.
/// - `Stopped`: event loop finished (stop requested, subscription closed or
///   a terminal error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Discovering,
    Running,
    Stopped,
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState::Idle
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineState::Idle => "idle",
            EngineState::Discovering => "discovering",
            EngineState::Running => "running",
            EngineState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Handle recorded for each directory registered with the notifier.
///
/// Ids are handed out in registration order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistrationId(pub u64);
