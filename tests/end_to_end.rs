mod common;
use crate::common::{canonical_tempdir, init_tracing, strings, with_timeout};

use std::error::Error;
use std::fs;
use std::time::Duration;

use watchrun::engine::{EngineState, WatchEngine};
use watchrun::exec::{ProcessRunner, RunSpec};
use watchrun::watch::{FilterSpec, NotifyWatcher};
use watchrun_test_utils::{FakeSpawner, SpawnOp};

type TestResult = Result<(), Box<dyn Error>>;

/// Real filesystem notifications, fake processes: the spawner journal shows
/// exactly which invocations and kills the engine performed.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn new_directory_then_write_restarts_once() -> TestResult {
    init_tracing();
    let (_tmp, root) = canonical_tempdir();
    let argv = strings(&["echo", "hi"]);

    let (notifier, stream) = NotifyWatcher::new()?;
    let spawner = FakeSpawner::new();
    let runner = ProcessRunner::new(RunSpec::new(argv.clone(), &root), spawner.clone());
    let (engine, handle) = WatchEngine::new(&root, FilterSpec::allow_all(), notifier, stream, runner);
    let task = tokio::spawn(engine.start());

    with_timeout(handle.wait_for_state(EngineState::Running)).await?;
    assert_eq!(spawner.spawn_count(), 1, "one initial invocation");

    fs::create_dir(root.join("sub"))?;
    // Let the engine pick up and register the new directory.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(spawner.spawn_count(), 1, "creating a directory must not re-run");

    // Retry the write in case registration was slower than expected; only
    // the first restart's ordering is asserted.
    let file = root.join("sub/f.txt");
    let mut restarted = false;
    for attempt in 0..20 {
        fs::write(&file, format!("attempt {attempt}"))?;
        for _ in 0..25 {
            if spawner.spawn_count() >= 2 {
                restarted = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        if restarted {
            break;
        }
    }
    assert!(restarted, "write inside the new directory should re-run the command");

    let journal = spawner.journal();
    assert_eq!(journal[0], SpawnOp::Spawned { argv: argv.clone(), pid: 1000 });
    assert_eq!(journal[1], SpawnOp::Killed { argv: argv.clone(), pgid: 1000 });
    assert_eq!(journal[2], SpawnOp::Spawned { argv: argv.clone(), pid: 1001 });

    handle.stop().await?;
    with_timeout(task).await??;

    assert_eq!(handle.state(), EngineState::Stopped);
    assert_eq!(spawner.live(), 0);
    assert!(matches!(spawner.journal().last(), Some(SpawnOp::Killed { .. })));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ignored_writes_do_not_restart() -> TestResult {
    init_tracing();
    let (_tmp, root) = canonical_tempdir();

    let (notifier, stream) = NotifyWatcher::new()?;
    let spawner = FakeSpawner::new();
    let runner = ProcessRunner::new(RunSpec::new(strings(&["true"]), &root), spawner.clone());
    let filter = FilterSpec::new(strings(&["*.rs"]), strings(&["*.tmp"]))?;
    let (engine, handle) = WatchEngine::new(&root, filter, notifier, stream, runner);
    let task = tokio::spawn(engine.start());

    with_timeout(handle.wait_for_state(EngineState::Running)).await?;

    fs::write(root.join("scratch.tmp"), b"ignored")?;
    fs::write(root.join("notes.md"), b"not watched")?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(spawner.spawn_count(), 1);

    fs::write(root.join("main.rs"), b"fn main() {}")?;
    common::wait_until("watched write", || spawner.spawn_count() >= 2).await;

    handle.stop().await?;
    with_timeout(task).await??;
    Ok(())
}
