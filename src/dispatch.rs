// src/dispatch.rs

//! Raw-event classification and filtering.
//!
//! This module turns `notify` events into [`ChangeEvent`]s: it maps the
//! platform event kind onto the five kinds the config can filter on, applies
//! the extension and kind allow-lists, and relativizes paths against the
//! project root. It does **not** know about debouncing or actions; surviving
//! events are handed straight to the scheduler.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use notify::Event;
use notify::EventKind;
use notify::event::ModifyKind;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::model::MonitorSection;
use crate::sched::TaskMan;

/// Simplified event kinds exposed to filters, commands and the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Write,
    Rename,
    Remove,
    Create,
    Chmod,
}

impl ChangeKind {
    /// Map a raw notify kind onto a filterable kind.
    ///
    /// Access and otherwise unclassifiable events return `None` and are
    /// dropped after logging.
    pub fn classify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            EventKind::Modify(ModifyKind::Metadata(_)) => Some(Self::Chmod),
            EventKind::Modify(_) => Some(Self::Write),
            EventKind::Remove(_) => Some(Self::Remove),
            _ => None,
        }
    }

    /// Parse a config label like `"write"`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "write" => Some(Self::Write),
            "rename" => Some(Self::Rename),
            "remove" => Some(Self::Remove),
            "create" => Some(Self::Create),
            "chmod" => Some(Self::Chmod),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Rename => "rename",
            Self::Remove => "remove",
            Self::Create => "create",
            Self::Chmod => "chmod",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A change that passed all filters, as handed to the scheduler and later to
/// the action runner. Ephemeral; consumed immediately, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    /// Path relative to the project root, forward slashes.
    pub file: String,
    /// Nanosecond timestamp, strictly increasing across events.
    pub changed: i64,
    /// Extension with a leading dot (`".go"`), or empty.
    pub ext: String,
    /// Kind label: write, rename, remove, create or chmod.
    pub event: String,
}

impl ChangeEvent {
    /// Synthetic empty record used by the one-shot mode.
    pub fn empty() -> Self {
        Self {
            file: String::new(),
            changed: 0,
            ext: String::new(),
            event: String::new(),
        }
    }
}

/// Classifies raw events and forwards qualifying ones to the scheduler.
pub struct EventDispatcher {
    root: PathBuf,
    types: Vec<String>,
    kinds: Vec<String>,
    stamp: AtomicI64,
}

impl EventDispatcher {
    pub fn new(root: PathBuf, monitor: &MonitorSection) -> Self {
        Self {
            root,
            types: monitor.types.clone(),
            kinds: monitor.events.clone(),
            stamp: AtomicI64::new(0),
        }
    }

    /// Handle one raw notify event: log it, then filter and forward each of
    /// its paths. Never blocks.
    pub fn dispatch(&self, event: &Event, taskman: &TaskMan) {
        let kind = ChangeKind::classify(&event.kind);
        for path in &event.paths {
            // Every raw event is logged, whether or not it survives the filters.
            debug!(kind = ?event.kind, path = %path.display(), "filesystem event");

            let Some(kind) = kind else { continue };
            if let Some(change) = self.filter(path, kind) {
                info!(event = %change.event, file = %change.file, "change event");
                taskman.put(change);
            }
        }
    }

    /// Apply the extension and kind allow-lists to a single path.
    ///
    /// Returns the forwarded [`ChangeEvent`] if the event qualifies.
    pub fn filter(&self, path: &Path, kind: ChangeKind) -> Option<ChangeEvent> {
        let ext = extension_of(path);
        if !self.type_allowed(&ext) {
            return None;
        }
        if !self.kind_allowed(kind) {
            return None;
        }

        let Some(file) = relative_str(&self.root, path) else {
            warn!(
                path = %path.display(),
                root = %self.root.display(),
                "could not relativize path against project root"
            );
            return None;
        };

        Some(ChangeEvent {
            file,
            changed: self.next_stamp(),
            ext,
            event: kind.label().to_string(),
        })
    }

    fn type_allowed(&self, ext: &str) -> bool {
        if self.types.is_empty() {
            return true;
        }
        self.types
            .iter()
            .any(|t| t == "*" || t == ".*" || t == ext)
    }

    fn kind_allowed(&self, kind: ChangeKind) -> bool {
        self.kinds.is_empty() || self.kinds.iter().any(|k| k == kind.label())
    }

    /// Wall-clock nanoseconds, clamped to be strictly increasing so a burst
    /// of events keeps its arrival order even at coarse clock resolution.
    fn next_stamp(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);

        let mut last = self.stamp.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .stamp
                .compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Extension of `path` with a leading dot (`".go"`), or empty when absent.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
