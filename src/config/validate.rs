// src/config/validate.rs

use anyhow::{Context, Result, anyhow};

use crate::config::model::ConfigFile;
use crate::dispatch::ChangeKind;
use crate::watch::dirset::{parse_exclude_rule, parse_include_rule};

/// Highest config schema version this build understands.
pub const SUPPORTED_VERSION: u32 = 1;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - `version` is supported
/// - every entry in `monitor.events` is a known event kind
/// - every `monitor.includeDirs` rule is well formed and relative
/// - every `monitor.exceptDirs` entry is relative and not the project root
///
/// All of these are startup-fatal so the runtime path never has to
/// terminate the process.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_version(cfg)?;
    validate_event_kinds(cfg)?;
    validate_include_rules(cfg)?;
    validate_exclude_rules(cfg)?;
    Ok(())
}

fn validate_version(cfg: &ConfigFile) -> Result<()> {
    if cfg.version > SUPPORTED_VERSION {
        return Err(anyhow!(
            "config version {} is newer than the supported maximum {}",
            cfg.version,
            SUPPORTED_VERSION
        ));
    }
    Ok(())
}

fn validate_event_kinds(cfg: &ConfigFile) -> Result<()> {
    for label in cfg.monitor.events.iter() {
        if ChangeKind::from_label(label).is_none() {
            return Err(anyhow!(
                "unknown event kind '{}' in monitor.events (expected one of \
                 write, rename, remove, create, chmod)",
                label
            ));
        }
    }
    Ok(())
}

fn validate_include_rules(cfg: &ConfigFile) -> Result<()> {
    for rule in cfg.monitor.include_dirs.iter() {
        parse_include_rule(rule)
            .with_context(|| format!("invalid monitor.includeDirs entry '{rule}'"))?;
    }
    Ok(())
}

fn validate_exclude_rules(cfg: &ConfigFile) -> Result<()> {
    for rule in cfg.monitor.except_dirs.iter() {
        parse_exclude_rule(rule)
            .with_context(|| format!("invalid monitor.exceptDirs entry '{rule}'"))?;
    }
    Ok(())
}
