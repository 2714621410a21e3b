// src/lib.rs

#[cfg(not(unix))]
compile_error!("watchrun relies on POSIX process groups and only supports unix targets");

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::WatchConfig;
use crate::engine::WatchEngine;
use crate::exec::{CommandSpawner, ProcessRunner, RunSpec};
use crate::watch::{FilterSpec, NotifyWatcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file + CLI)
/// - the notify-backed watcher
/// - the process runner
/// - the watch engine, on its own task
/// - Ctrl-C / SIGTERM handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let filter = FilterSpec::new(cfg.watch.clone(), cfg.ignore.clone())?;
    let (notifier, stream) = NotifyWatcher::new()?;
    let runner = ProcessRunner::new(RunSpec::new(cfg.command.clone(), &cfg.root), CommandSpawner);

    let (engine, handle) = WatchEngine::new(cfg.root.clone(), filter, notifier, stream, runner);
    let mut engine_task = tokio::spawn(engine.start());

    tokio::select! {
        joined = &mut engine_task => {
            // The engine ended on its own; nothing left to stop.
            joined??;
            return Ok(());
        }
        _ = shutdown_signal() => {
            info!("shutdown requested");
        }
    }

    handle.stop().await?;
    engine_task.await??;
    info!("watchrun exiting");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                eprintln!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &WatchConfig) {
    println!("watchrun dry-run");
    println!("  dir: {}", cfg.root.display());
    if cfg.command.is_empty() {
        println!("  command: (none)");
    } else {
        println!("  command: {:?}", cfg.command);
    }
    if !cfg.watch.is_empty() {
        println!("  pattern: {:?}", cfg.watch);
    }
    if !cfg.ignore.is_empty() {
        println!("  ignore: {:?}", cfg.ignore);
    }

    debug!("dry-run complete (no execution)");
}
