// src/action/command.rs

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::dispatch::ChangeEvent;

/// Fill a command template with the fields of the triggering change.
pub fn substitute(template: &str, change: &ChangeEvent) -> String {
    template
        .replace("{{file}}", &change.file)
        .replace("{{ext}}", &change.ext)
        .replace("{{event}}", &change.event)
        .replace("{{changed}}", &change.changed.to_string())
}

/// Run a single command template through the platform shell.
///
/// Stdout and stderr are streamed into the log. A non-zero exit is logged as
/// a warning, not an error; only spawn/wait failures bubble up.
pub async fn run_command(root: &Path, template: &str, change: &ChangeEvent) -> Result<()> {
    let cmdline = substitute(template, change);
    info!(cmd = %cmdline, "running command");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&cmdline);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&cmdline);
        c
    };

    cmd.current_dir(root)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{cmdline}'"))?;

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(stream_lines(stdout, false));
    }
    // Always consume stderr so buffers don't fill.
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(stream_lines(stderr, true));
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for '{cmdline}'"))?;

    let code = status.code().unwrap_or(-1);
    if status.success() {
        info!(cmd = %cmdline, "command finished");
    } else {
        warn!(cmd = %cmdline, exit_code = code, "command exited non-zero");
    }

    Ok(())
}

async fn stream_lines(reader: impl AsyncRead + Unpin, is_stderr: bool) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if is_stderr {
            debug!("stderr: {line}");
        } else {
            info!("{line}");
        }
    }
}
