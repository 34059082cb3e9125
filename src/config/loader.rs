// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (version gate, rule shapes, etc.). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and run semantic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - a supported `version`,
///   - known event kinds in `monitor.events`,
///   - well-formed include rules and relative, non-root excludes.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Commented example configuration written by `--init`.
pub const EXAMPLE_CONFIG: &str = r#"# watchcmd configuration

version = 1

[monitor]
# Extension allow-list; empty means all file types. "*" matches everything.
types = [".go"]
# Event kinds to react to: write, rename, remove, create, chmod.
# Empty means all kinds.
events = ["write"]
# Directories to watch. "." is the project root; a trailing "*" watches the
# whole subtree, including directories created later.
includeDirs = [". *"]
# Subtrees that are never watched.
exceptDirs = [".git"]

[command]
# Commands run in order on each dispatch. {{file}}, {{ext}}, {{event}} and
# {{changed}} are replaced with the fields of the triggering change.
exec = ["go build"]
# Settling window in milliseconds; changes arriving within the window are
# coalesced into one dispatch. 0 disables coalescing.
delayMillSecond = 2000

[notifier]
# Webhook called with the change metadata as JSON; empty disables it.
callUrl = ""
"#;

/// Write the example config to `path`, refusing to overwrite an existing file.
pub fn write_example_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        bail!(
            "config file {:?} already exists; delete it first to regenerate",
            path
        );
    }
    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("writing example config to {:?}", path))?;
    Ok(())
}
