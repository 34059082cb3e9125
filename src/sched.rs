// src/sched.rs

//! Trailing-edge debounce between the dispatcher and the action runner.
//!
//! Bursts of qualifying changes (an editor save often produces write, rename
//! and chmod for one logical change) collapse into a single dispatch carrying
//! the newest change. At most one dispatch is pending at any instant; a newer
//! change replaces the carried one and re-arms the timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dispatch::ChangeEvent;

/// Debounced task scheduler.
///
/// Cloning is cheap; all clones share the same pending state.
#[derive(Clone)]
pub struct TaskMan {
    delay: Duration,
    action_tx: mpsc::Sender<ChangeEvent>,
    state: Arc<Mutex<SchedState>>,
}

#[derive(Default)]
struct SchedState {
    /// Bumped on every re-arm. A firing timer whose epoch is stale lost the
    /// race to a newer change and must not dispatch.
    epoch: u64,
    pending: Option<ChangeEvent>,
    timer: Option<JoinHandle<()>>,
}

impl TaskMan {
    /// `delay_ms` is the settling window; `action_tx` feeds the action
    /// runner loop.
    pub fn new(delay_ms: u64, action_tx: mpsc::Sender<ChangeEvent>) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            action_tx,
            state: Arc::new(Mutex::new(SchedState::default())),
        }
    }

    /// Record a qualifying change.
    ///
    /// Never blocks the caller and is safe under concurrent calls: the whole
    /// replace-pending/re-arm step is one critical section with no awaits.
    /// With a zero delay, coalescing is disabled and the change is forwarded
    /// immediately without touching the pending state.
    pub fn put(&self, change: ChangeEvent) {
        if self.delay.is_zero() {
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                if tx.send(change).await.is_err() {
                    warn!("action runner is gone; dropping change");
                }
            });
            return;
        }

        let mut state = self.lock();
        state.epoch += 1;
        state.pending = Some(change);

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let armed_epoch = state.epoch;
        let this = self.clone();
        state.timer = Some(tokio::spawn(async move {
            this.fire_after(armed_epoch).await;
        }));
    }

    async fn fire_after(self, armed_epoch: u64) {
        tokio::time::sleep(self.delay).await;

        let fired = {
            let mut state = self.lock();
            if state.epoch != armed_epoch {
                // Superseded by a newer change; its timer owns the dispatch.
                return;
            }
            state.timer = None;
            state.pending.take()
        };

        if let Some(change) = fired {
            debug!(file = %change.file, "settling window elapsed, dispatching");
            if self.action_tx.send(change).await.is_err() {
                warn!("action runner is gone; dropping change");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SchedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
