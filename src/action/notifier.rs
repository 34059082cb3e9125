// src/action/notifier.rs

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::dispatch::ChangeEvent;

/// JSON body delivered to the webhook.
#[derive(Debug, Serialize)]
struct ChangePayload<'a> {
    project: String,
    file: &'a str,
    changed: i64,
    ext: &'a str,
    event: &'a str,
}

/// POST the change metadata to `url`.
///
/// Best-effort, fire-and-forget: no retry, no backoff, no imposed timeout.
/// Non-2xx responses and transport errors surface as `Err` for the caller
/// to log.
pub async fn post_change(
    http: &reqwest::Client,
    url: &str,
    project_root: &Path,
    change: &ChangeEvent,
) -> Result<()> {
    let payload = ChangePayload {
        project: project_root.display().to_string(),
        file: &change.file,
        changed: change.changed,
        ext: &change.ext,
        event: &change.event,
    };

    let response = http
        .post(url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("calling webhook {url}"))?;

    let status = response.status();
    response
        .error_for_status()
        .with_context(|| format!("webhook {url} answered {status}"))?;

    debug!(url, %status, "webhook delivered");
    Ok(())
}
