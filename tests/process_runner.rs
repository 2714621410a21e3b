mod common;
use crate::common::{init_tracing, strings, with_timeout};

use std::error::Error;
use std::sync::Arc;

use watchrun::errors::WatchrunError;
use watchrun::exec::{ProcessRunner, RunSpec};
use watchrun_test_utils::{FakeSpawner, SpawnOp};

type TestResult = Result<(), Box<dyn Error>>;

fn runner(argv: &[&str]) -> (ProcessRunner<FakeSpawner>, FakeSpawner) {
    let spawner = FakeSpawner::new();
    let runner = ProcessRunner::new(RunSpec::new(strings(argv), "."), spawner.clone());
    (runner, spawner)
}

#[tokio::test]
async fn empty_command_fails_without_spawning() {
    init_tracing();
    let (runner, spawner) = runner(&[]);

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, WatchrunError::EmptyCommand));
    assert_eq!(err.to_string(), "Could not execute empty command");
    assert!(spawner.journal().is_empty());
    assert!(!runner.is_running().await);
}

#[tokio::test]
async fn restart_kills_previous_group_before_spawning() -> TestResult {
    init_tracing();
    let (runner, spawner) = runner(&["sleep", "0.5"]);
    let argv = strings(&["sleep", "0.5"]);

    runner.run().await?;
    runner.run().await?;

    assert_eq!(
        spawner.journal(),
        vec![
            SpawnOp::Spawned { argv: argv.clone(), pid: 1000 },
            SpawnOp::Killed { argv: argv.clone(), pgid: 1000 },
            SpawnOp::Spawned { argv, pid: 1001 },
        ]
    );
    assert_eq!(spawner.live(), 1);
    assert_eq!(spawner.max_live(), 1);
    assert_eq!(runner.current_pid().await, Some(1001));
    Ok(())
}

#[tokio::test]
async fn stop_without_run_is_idempotent() -> TestResult {
    init_tracing();
    let (runner, spawner) = runner(&["echo", "hi"]);

    runner.stop().await?;
    runner.stop().await?;

    assert!(spawner.journal().is_empty());
    Ok(())
}

#[tokio::test]
async fn stop_kills_once_then_becomes_a_noop() -> TestResult {
    init_tracing();
    let (runner, spawner) = runner(&["echo", "hi"]);

    runner.run().await?;
    runner.stop().await?;
    runner.stop().await?;

    assert_eq!(spawner.spawn_count(), 1);
    assert_eq!(spawner.kill_count(), 1);
    assert_eq!(spawner.live(), 0);
    assert!(!runner.is_running().await);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_never_overlap() -> TestResult {
    init_tracing();
    let (runner, spawner) = runner(&["make", "serve"]);
    let runner = Arc::new(runner);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let runner = Arc::clone(&runner);
        handles.push(tokio::spawn(async move { runner.run().await }));
    }
    for handle in handles {
        with_timeout(handle).await??;
    }

    assert_eq!(spawner.max_live(), 1);
    assert_eq!(spawner.spawn_count(), 16);
    assert_eq!(spawner.kill_count(), 15);

    // Strict alternation: every kill targets the spawn right before it.
    let journal = spawner.journal();
    for pair in journal.windows(2) {
        match pair {
            [SpawnOp::Spawned { pid, .. }, SpawnOp::Killed { pgid, .. }] => {
                assert_eq!(*pid as i32, *pgid);
            }
            [SpawnOp::Killed { .. }, SpawnOp::Spawned { .. }] => {}
            other => panic!("unexpected ordering: {other:?}"),
        }
    }
    Ok(())
}

#[tokio::test]
async fn failed_kill_is_surfaced_and_blocks_the_restart() -> TestResult {
    init_tracing();
    let (runner, spawner) = runner(&["sleep", "10"]);

    runner.run().await?;
    spawner.fail_kills(true);

    let err = runner.run().await.unwrap_err();
    match err {
        WatchrunError::Kill { pgid, argv, .. } => {
            assert_eq!(pgid, 1000);
            assert_eq!(argv, strings(&["sleep", "10"]));
        }
        other => panic!("expected Kill error, got {other:?}"),
    }

    // No replacement was started and the old record is kept.
    assert_eq!(spawner.spawn_count(), 1);
    assert_eq!(runner.current_pid().await, Some(1000));

    let err = runner.stop().await.unwrap_err();
    assert!(matches!(err, WatchrunError::Kill { .. }));

    spawner.fail_kills(false);
    runner.stop().await?;
    assert!(!runner.is_running().await);
    Ok(())
}

#[tokio::test]
async fn failed_spawn_leaves_no_live_handle() -> TestResult {
    init_tracing();
    let (runner, spawner) = runner(&["cargo", "run"]);

    runner.run().await?;
    spawner.fail_spawns(true);

    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, WatchrunError::Spawn { .. }));

    // The old instance was killed before the spawn failed.
    assert_eq!(spawner.kill_count(), 1);
    assert_eq!(spawner.live(), 0);
    assert!(!runner.is_running().await);
    Ok(())
}
