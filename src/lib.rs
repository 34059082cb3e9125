// src/lib.rs

pub mod action;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod logging;
pub mod sched;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::action::{ActionContext, run_action, spawn_action_runner};
use crate::cli::CliArgs;
use crate::config::loader::{load_and_validate, write_example_config};
use crate::dispatch::{ChangeEvent, EventDispatcher};
use crate::sched::TaskMan;
use crate::watch::{build_watch_plan, spawn_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - watch-set construction and subscription
/// - dispatcher / scheduler / action runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);

    if args.init {
        write_example_config(&config_path)?;
        info!(path = %config_path.display(), "example config written");
        return Ok(());
    }

    let cfg = load_and_validate(&config_path)?;
    let root = project_root_dir(&config_path)?;

    let ctx = ActionContext::new(&root, &cfg);

    if args.once {
        // One-shot validation mode: act on a synthetic empty change record,
        // bypassing watch setup entirely.
        run_action(&ctx, &ChangeEvent::empty()).await;
        return Ok(());
    }

    info!("collecting directory information...");
    let plan = build_watch_plan(&root, &cfg.monitor.include_dirs, &cfg.monitor.except_dirs)?;
    if plan.dirs.is_empty() {
        warn!("includeDirs resolved to an empty watch set; nothing will trigger");
    }

    let action_tx = spawn_action_runner(ctx);
    let taskman = TaskMan::new(cfg.command.delay_mill_second, action_tx);
    let dispatcher = EventDispatcher::new(root.clone(), &cfg.monitor);

    let handle = spawn_watcher(plan, dispatcher, taskman)?;
    info!(dirs = handle.manager().watched_count(), "watchcmd is ready");

    // Ctrl-C → stop the watch loop. Shutdown is not drain-safe: a pending
    // settling window may be abandoned.
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;
    handle.shutdown().await;

    Ok(())
}

/// The project root is the directory containing the config file.
fn project_root_dir(config_path: &Path) -> Result<PathBuf> {
    let dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    dir.canonicalize()
        .with_context(|| format!("resolving project root from {:?}", config_path))
}
