// src/watch/mod.rs

//! Watch-set construction and live filesystem watching.
//!
//! This module is responsible for:
//! - Turning `includeDirs` / `exceptDirs` rules into the initial watch set.
//! - Wiring up a cross-platform filesystem watcher (`notify`) with one
//!   non-recursive subscription per directory.
//! - Keeping coverage alive as directories are created or renamed under a
//!   recursive root.
//!
//! It does **not** know about debouncing or actions; it only hands raw
//! events to the dispatcher.

pub mod dirset;
pub mod manager;
pub mod watcher;

pub use dirset::{IncludeRule, WatchPlan, build_watch_plan, parse_exclude_rule, parse_include_rule};
pub use manager::WatchManager;
pub use watcher::{WatcherHandle, spawn_watcher};
