// src/watch/manager.rs

//! Live watch coverage: subscriptions and dynamic resubscription.
//!
//! Each directory is subscribed non-recursively, so new subdirectories under
//! a recursive root are invisible until subscribed individually. The
//! [`WatchManager`] owns the notify watcher together with all mutable watch
//! state and reacts to create/rename events by extending or refreshing
//! coverage.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::watch::dirset::WatchPlan;

/// Owns the notify watcher and all mutable watch state.
///
/// Every mutation funnels through this type; the inner mutex serializes
/// writes with the reads that decide whether to (re)subscribe. Lock sections
/// are short and never await.
pub struct WatchManager {
    inner: Mutex<WatchInner>,
}

struct WatchInner {
    watcher: RecommendedWatcher,
    dirs: BTreeSet<PathBuf>,
    recursive_roots: BTreeSet<PathBuf>,
    excludes: Vec<PathBuf>,
}

impl WatchManager {
    pub fn new(watcher: RecommendedWatcher, plan: WatchPlan) -> Self {
        Self {
            inner: Mutex::new(WatchInner {
                watcher,
                dirs: plan.dirs,
                recursive_roots: plan.recursive_roots,
                excludes: plan.excludes,
            }),
        }
    }

    /// Subscribe every directory in the plan.
    ///
    /// Any failure here is fatal: with a hole in the initial set the tool
    /// cannot guarantee correct coverage.
    pub fn subscribe_all(&self) -> Result<()> {
        let mut inner = self.lock();
        let dirs: Vec<PathBuf> = inner.dirs.iter().cloned().collect();
        for dir in dirs {
            info!(dir = %dir.display(), "watcher add");
            inner
                .watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("subscribing to {:?}", dir))?;
        }
        info!(total = inner.dirs.len(), "watch set subscribed");
        Ok(())
    }

    /// Number of directories currently subscribed.
    pub fn watched_count(&self) -> usize {
        self.lock().dirs.len()
    }

    /// Whether `path` is a current member of the watch set.
    pub fn is_watched(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    /// React to a raw create/rename event path: extend or refresh coverage.
    ///
    /// A new directory under a recursive root is subscribed unless excluded;
    /// a path already in the watch set gets its subscription dropped and
    /// re-added, so a rename target reusing a watched path does not keep a
    /// stale subscription. Failures are logged and never fatal.
    ///
    /// Coverage only extends from an already-watched parent: a subtree
    /// created several levels deep under an unwatched intermediate directory
    /// in one operation stays invisible.
    pub fn handle_dir_change(&self, path: &Path) {
        if fs::read_dir(path).is_err() {
            return;
        }

        let mut inner = self.lock();

        let mut done = false;
        let under_recursive_root = inner.recursive_roots.iter().any(|r| path.starts_with(r));
        if under_recursive_root {
            if inner.excludes.iter().any(|e| path.starts_with(e)) {
                debug!(dir = %path.display(), "directory is excluded, not watching");
                return;
            }
            done = inner.resubscribe(path);
            if done {
                inner.dirs.insert(path.to_path_buf());
            }
        }
        if done {
            return;
        }

        if inner.dirs.contains(path) {
            inner.resubscribe(path);
        }
    }

    fn lock(&self) -> MutexGuard<'_, WatchInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WatchInner {
    /// Drop-then-readd the subscription for `path`. Returns whether the
    /// re-add succeeded.
    fn resubscribe(&mut self, path: &Path) -> bool {
        let _ = self.watcher.unwatch(path);
        match self.watcher.watch(path, RecursiveMode::NonRecursive) {
            Ok(()) => {
                info!(dir = %path.display(), "watcher add");
                true
            }
            Err(err) => {
                warn!(dir = %path.display(), error = %err, "watcher add failed");
                false
            }
        }
    }
}
