use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use watchrun::errors::{Result, WatchrunError};
use watchrun::exec::{ProcessSpawner, RunSpec, Spawned};

/// One call observed by the [`FakeSpawner`], in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOp {
    Spawned { argv: Vec<String>, pid: u32 },
    Killed { argv: Vec<String>, pgid: i32 },
}

#[derive(Debug)]
struct State {
    journal: Mutex<Vec<SpawnOp>>,
    next_pid: AtomicU32,
    live: AtomicUsize,
    max_live: AtomicUsize,
    fail_kill: AtomicBool,
    fail_spawn: AtomicBool,
}

/// A fake spawner that:
/// - records every spawn and group kill in a shared journal
/// - tracks how many "processes" are live at once
/// - can be told to fail kills or spawns.
///
/// Clones share the same state, so a test can keep one clone while the
/// runner owns another.
#[derive(Debug, Clone)]
pub struct FakeSpawner {
    state: Arc<State>,
}

impl Default for FakeSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSpawner {
    pub fn new() -> Self {
        Self {
            state: Arc::new(State {
                journal: Mutex::new(Vec::new()),
                next_pid: AtomicU32::new(1000),
                live: AtomicUsize::new(0),
                max_live: AtomicUsize::new(0),
                fail_kill: AtomicBool::new(false),
                fail_spawn: AtomicBool::new(false),
            }),
        }
    }

    pub fn journal(&self) -> Vec<SpawnOp> {
        self.state.journal.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.journal()
            .iter()
            .filter(|op| matches!(op, SpawnOp::Spawned { .. }))
            .count()
    }

    pub fn kill_count(&self) -> usize {
        self.journal()
            .iter()
            .filter(|op| matches!(op, SpawnOp::Killed { .. }))
            .count()
    }

    /// Number of spawned-but-not-killed processes right now.
    pub fn live(&self) -> usize {
        self.state.live.load(Ordering::SeqCst)
    }

    /// Highest value `live()` ever reached.
    pub fn max_live(&self) -> usize {
        self.state.max_live.load(Ordering::SeqCst)
    }

    pub fn fail_kills(&self, fail: bool) {
        self.state.fail_kill.store(fail, Ordering::SeqCst);
    }

    pub fn fail_spawns(&self, fail: bool) {
        self.state.fail_spawn.store(fail, Ordering::SeqCst);
    }
}

impl ProcessSpawner for FakeSpawner {
    type Child = ();

    fn spawn_group(&self, spec: &RunSpec) -> Result<Spawned<()>> {
        if self.state.fail_spawn.load(Ordering::SeqCst) {
            return Err(WatchrunError::Spawn {
                argv: spec.argv().to_vec(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake spawn failure"),
            });
        }

        let pid = self.state.next_pid.fetch_add(1, Ordering::SeqCst);
        let live = self.state.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_live.fetch_max(live, Ordering::SeqCst);

        self.state.journal.lock().unwrap().push(SpawnOp::Spawned {
            argv: spec.argv().to_vec(),
            pid,
        });

        Ok(Spawned {
            pid,
            pgid: pid as i32,
            child: (),
        })
    }

    fn kill_group<'a>(
        &'a self,
        spec: &'a RunSpec,
        spawned: &'a mut Spawned<()>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            // Give other tasks a chance to interleave with an in-flight kill.
            tokio::task::yield_now().await;

            if state.fail_kill.load(Ordering::SeqCst) {
                return Err(WatchrunError::Kill {
                    pgid: spawned.pgid,
                    argv: spec.argv().to_vec(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such process group"),
                });
            }

            state.live.fetch_sub(1, Ordering::SeqCst);
            state.journal.lock().unwrap().push(SpawnOp::Killed {
                argv: spec.argv().to_vec(),
                pgid: spawned.pgid,
            });
            Ok(())
        })
    }
}
