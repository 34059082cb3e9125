// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from `Watchcmd.toml`.
///
/// ```toml
/// version = 1
///
/// [monitor]
/// types = [".rs", ".toml"]
/// events = ["write", "create"]
/// includeDirs = [". *"]
/// exceptDirs = ["target"]
///
/// [command]
/// exec = ["cargo check"]
/// delayMillSecond = 300
///
/// [notifier]
/// callUrl = "http://127.0.0.1:8080/changed"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Config schema version; anything above [`crate::config::SUPPORTED_VERSION`]
    /// is rejected at load time.
    #[serde(default = "default_version")]
    pub version: u32,

    /// What to watch and which events to react to, from `[monitor]`.
    #[serde(default)]
    pub monitor: MonitorSection,

    /// What to run on a dispatch, from `[command]`.
    #[serde(default)]
    pub command: CommandSection,

    /// Optional webhook target, from `[notifier]`.
    #[serde(default)]
    pub notifier: NotifierSection,
}

fn default_version() -> u32 {
    1
}

/// `[monitor]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSection {
    /// Extension allow-list, entries like `".go"`.
    ///
    /// Empty means all types; `"*"` (or `".*"`) is an explicit catch-all.
    #[serde(default)]
    pub types: Vec<String>,

    /// Event-kind allow-list, entries from
    /// {write, rename, remove, create, chmod}. Empty means all kinds.
    #[serde(default)]
    pub events: Vec<String>,

    /// Include rules, each `.` | `dir` | `. *` | `dir *`.
    ///
    /// A trailing `*` watches the whole subtree, including directories
    /// created after startup.
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Directories whose subtrees are never watched. Relative paths only;
    /// the project root itself cannot be excluded.
    #[serde(default)]
    pub except_dirs: Vec<String>,
}

/// `[command]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommandSection {
    /// Shell commands run in order on each dispatch.
    ///
    /// Occurrences of `{{file}}`, `{{ext}}`, `{{event}}` and `{{changed}}`
    /// are replaced with the fields of the change that triggered the run.
    #[serde(default)]
    pub exec: Vec<String>,

    /// Settling window in milliseconds. Events arriving within this window
    /// are coalesced into a single dispatch carrying the newest one.
    ///
    /// `0` disables coalescing entirely.
    #[serde(default)]
    pub delay_mill_second: u64,
}

/// `[notifier]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotifierSection {
    /// Webhook URL; absent or empty disables the HTTP call.
    #[serde(default)]
    pub call_url: Option<String>,
}

impl NotifierSection {
    /// Effective webhook target, treating an empty string as disabled.
    pub fn effective_call_url(&self) -> Option<&str> {
        match self.call_url.as_deref() {
            Some("") | None => None,
            Some(url) => Some(url),
        }
    }
}
