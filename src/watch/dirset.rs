// src/watch/dirset.rs

//! Static watch-set construction from include/exclude rules.
//!
//! Include rules are literal directory paths with an optional trailing `*`
//! marking the whole subtree; excludes are literal directory paths whose
//! subtrees are pruned from whatever the includes produced. Excludes always
//! win, including over the wildcard-root override.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use walkdir::WalkDir;

/// A single parsed `includeDirs` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeRule {
    /// `.` — the project root only.
    Root,
    /// `. *` — the root and its whole subtree, kept covered as it grows.
    RootRecursive,
    /// `dir` — a single directory.
    Dir(PathBuf),
    /// `dir *` — a directory and its whole subtree, kept covered as it grows.
    DirRecursive(PathBuf),
}

/// Parse one `includeDirs` entry.
///
/// Entries are one or two whitespace-separated tokens; the only valid second
/// token is `*`. Absolute paths are rejected.
pub fn parse_include_rule(rule: &str) -> Result<IncludeRule> {
    let tokens: Vec<&str> = rule.split_whitespace().collect();
    let (dir, recursive) = match tokens.as_slice() {
        [dir] => (*dir, false),
        [dir, "*"] => (*dir, true),
        _ => bail!("include rule '{rule}' must be '.', 'dir', '. *' or 'dir *'"),
    };
    ensure_relative(dir)?;

    Ok(match (dir, recursive) {
        (".", false) => IncludeRule::Root,
        (".", true) => IncludeRule::RootRecursive,
        (d, false) => IncludeRule::Dir(PathBuf::from(d)),
        (d, true) => IncludeRule::DirRecursive(PathBuf::from(d)),
    })
}

/// Parse one `exceptDirs` entry. The project root cannot be excluded.
pub fn parse_exclude_rule(rule: &str) -> Result<PathBuf> {
    let rule = rule.trim();
    if rule.is_empty() {
        bail!("exclude rule must not be empty");
    }
    if rule == "." {
        bail!("the project root cannot be excluded");
    }
    ensure_relative(rule)?;
    Ok(PathBuf::from(rule))
}

fn ensure_relative(dir: &str) -> Result<()> {
    if Path::new(dir).is_absolute() {
        bail!("'{dir}' is absolute; watch rules must be relative to the project root");
    }
    Ok(())
}

/// Result of applying the include/exclude algebra to the live tree.
#[derive(Debug, Default)]
pub struct WatchPlan {
    /// Directories to subscribe, absolute.
    pub dirs: BTreeSet<PathBuf>,
    /// Roots whose future subtrees must stay covered, absolute.
    pub recursive_roots: BTreeSet<PathBuf>,
    /// Resolved exclude prefixes, absolute.
    pub excludes: Vec<PathBuf>,
}

/// Build the initial watch set for `root` from raw config rules.
///
/// Includes are processed in order. `. *` has the highest priority: it
/// resets the set to the whole tree, marks the root recursive and
/// short-circuits the remaining include rules. Excludes are applied last and
/// remove the excluded path and all descendants no matter how they were
/// added.
pub fn build_watch_plan(
    root: &Path,
    include_dirs: &[String],
    except_dirs: &[String],
) -> Result<WatchPlan> {
    let mut plan = WatchPlan::default();

    for raw in include_dirs {
        match parse_include_rule(raw)? {
            IncludeRule::Root => {
                plan.dirs.insert(root.to_path_buf());
            }
            IncludeRule::RootRecursive => {
                plan.dirs = subtree_dirs(root);
                plan.dirs.insert(root.to_path_buf());
                plan.recursive_roots.insert(root.to_path_buf());
                break;
            }
            IncludeRule::Dir(d) => {
                plan.dirs.insert(root.join(d));
            }
            IncludeRule::DirRecursive(d) => {
                let abs = root.join(d);
                plan.dirs.extend(subtree_dirs(&abs));
                plan.dirs.insert(abs.clone());
                plan.recursive_roots.insert(abs);
            }
        }
    }

    for raw in except_dirs {
        let abs = root.join(parse_exclude_rule(raw)?);
        plan.dirs.retain(|d| !d.starts_with(&abs));
        plan.excludes.push(abs);
    }

    Ok(plan)
}

/// Every directory strictly below `dir` that exists right now.
///
/// Unreadable entries are skipped; the subtree stays best-effort until the
/// resubscription path picks up later changes.
fn subtree_dirs(dir: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect()
}
