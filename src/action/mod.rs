// src/action/mod.rs

//! Action execution layer.
//!
//! This module is responsible for actually acting on a dispatched change:
//! running the configured commands via `tokio::process::Command` and posting
//! the change metadata to the webhook, if one is configured.
//!
//! - [`command`] runs a single shell command with placeholder substitution.
//! - [`notifier`] delivers the JSON payload to the webhook.
//!
//! The runner loop processes one change at a time, so invocations never
//! overlap; a slow command delays later dispatches but never event intake.

pub mod command;
pub mod notifier;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::model::ConfigFile;
use crate::dispatch::ChangeEvent;

/// Everything needed to act on a dispatched change.
pub struct ActionContext {
    /// Project root; commands run with this as their working directory.
    pub project_root: PathBuf,
    /// Shell command templates, run in order.
    pub exec: Vec<String>,
    /// Webhook target, already normalized (empty string means disabled).
    pub call_url: Option<String>,
    /// Shared HTTP client for webhook calls.
    pub http: reqwest::Client,
}

impl ActionContext {
    pub fn new(project_root: &Path, cfg: &ConfigFile) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            exec: cfg.command.exec.clone(),
            call_url: cfg.notifier.effective_call_url().map(str::to_string),
            http: reqwest::Client::new(),
        }
    }
}

/// Spawn the action runner loop.
///
/// The returned sender is what the scheduler feeds dispatched changes into.
/// Each change is processed fully before the next one is picked up.
pub fn spawn_action_runner(ctx: ActionContext) -> mpsc::Sender<ChangeEvent> {
    let (tx, mut rx) = mpsc::channel::<ChangeEvent>(64);

    tokio::spawn(async move {
        info!("action runner started");
        while let Some(change) = rx.recv().await {
            run_action(&ctx, &change).await;
        }
        info!("action runner finished (channel closed)");
    });

    tx
}

/// Run the configured commands and webhook for one change.
///
/// Failures are logged as warnings and never abort the remaining steps or
/// future dispatches. Also used directly by the one-shot mode with an empty
/// change record.
pub async fn run_action(ctx: &ActionContext, change: &ChangeEvent) {
    for template in &ctx.exec {
        if let Err(err) = command::run_command(&ctx.project_root, template, change).await {
            warn!(cmd = %template, error = %err, "command execution failed");
        }
    }

    if let Some(url) = ctx.call_url.as_deref() {
        if let Err(err) = notifier::post_change(&ctx.http, url, &ctx.project_root, change).await {
            warn!(url, error = %err, "webhook delivery failed");
        }
    }
}
