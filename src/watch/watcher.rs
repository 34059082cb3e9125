// src/watch/watcher.rs

use std::sync::Arc;

use anyhow::Result;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::dispatch::EventDispatcher;
use crate::sched::TaskMan;
use crate::watch::dirset::WatchPlan;
use crate::watch::manager::WatchManager;

/// Handle for the filesystem watch loop.
///
/// Keeps the [`WatchManager`] (and with it the underlying watcher and all
/// subscriptions) alive. Asking for shutdown stops the loop and aborts any
/// in-flight resubscription tasks; a pending dispatch may be abandoned.
pub struct WatcherHandle {
    manager: Arc<WatchManager>,
    shutdown_tx: mpsc::Sender<()>,
}

impl WatcherHandle {
    pub fn manager(&self) -> &Arc<WatchManager> {
        &self.manager
    }

    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Subscribe the initial watch set and spawn the event loop.
///
/// The loop single-threadedly drains two channels, raw events and watcher
/// errors. Per raw event it spawns the resubscription handler onto the
/// blocking pool (it touches the filesystem) and runs the dispatcher inline;
/// the dispatcher only filters and does a non-blocking hand-off to the
/// scheduler, so event intake is never stalled.
pub fn spawn_watcher(
    plan: WatchPlan,
    dispatcher: EventDispatcher,
    taskman: TaskMan,
) -> Result<WatcherHandle> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let (err_tx, mut err_rx) = mpsc::unbounded_channel::<notify::Error>();
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    // Closure called synchronously by notify whenever an event arrives.
    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = event_tx.send(event);
            }
            Err(err) => {
                let _ = err_tx.send(err);
            }
        },
        Config::default(),
    )?;

    let manager = Arc::new(WatchManager::new(watcher, plan));
    manager.subscribe_all()?;

    let loop_manager = Arc::clone(&manager);
    tokio::spawn(async move {
        // Per-event resubscription tasks; joined as they finish and aborted
        // together at shutdown.
        let mut resubs: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else { break };
                    if touches_coverage(&event) {
                        for path in event.paths.clone() {
                            let manager = Arc::clone(&loop_manager);
                            resubs.spawn_blocking(move || manager.handle_dir_change(&path));
                        }
                    }
                    dispatcher.dispatch(&event, &taskman);
                }
                err = err_rx.recv() => {
                    let Some(err) = err else { break };
                    error!(error = %err, "watch source error");
                }
                Some(_) = resubs.join_next() => {}
                _ = shutdown_rx.recv() => {
                    info!("watch loop shutting down");
                    break;
                }
            }
        }

        resubs.abort_all();
        debug!("watch loop ended");
    });

    Ok(WatcherHandle {
        manager,
        shutdown_tx,
    })
}

/// Only create and rename events can change directory coverage.
fn touches_coverage(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}
