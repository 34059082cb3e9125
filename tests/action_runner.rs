use std::error::Error;
use std::fs;

use tempfile::TempDir;
use watchcmd::action::command::{run_command, substitute};
use watchcmd::dispatch::ChangeEvent;

type TestResult = Result<(), Box<dyn Error>>;

fn sample_change() -> ChangeEvent {
    ChangeEvent {
        file: "src/main.go".to_string(),
        changed: 1_700_000_000_000_000_000,
        ext: ".go".to_string(),
        event: "write".to_string(),
    }
}

#[test]
fn placeholders_are_substituted() {
    let change = sample_change();
    let cmdline = substitute("echo {{event}} {{file}} {{ext}} {{changed}}", &change);
    assert_eq!(
        cmdline,
        "echo write src/main.go .go 1700000000000000000"
    );
}

#[test]
fn templates_without_placeholders_pass_through() {
    let change = sample_change();
    assert_eq!(substitute("go build ./...", &change), "go build ./...");
}

#[test]
fn empty_change_record_substitutes_empty_fields() {
    let change = ChangeEvent::empty();
    assert_eq!(substitute("run {{file}}{{ext}}", &change), "run ");
    assert_eq!(substitute("at {{changed}}", &change), "at 0");
}

#[cfg(unix)]
#[tokio::test]
async fn command_runs_in_the_project_root() -> TestResult {
    let tmp = TempDir::new()?;
    let change = sample_change();

    run_command(tmp.path(), "echo {{file}} > touched.txt", &change).await?;

    let contents = fs::read_to_string(tmp.path().join("touched.txt"))?;
    assert_eq!(contents.trim(), "src/main.go");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_is_not_an_error() -> TestResult {
    let tmp = TempDir::new()?;
    // A failing command is logged as a warning; the watcher keeps running.
    run_command(tmp.path(), "exit 3", &sample_change()).await?;
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn missing_shell_binary_fails_but_is_isolated() -> TestResult {
    let tmp = TempDir::new()?;
    // `sh -c` itself succeeds in spawning; an unknown command is a non-zero
    // exit, which is logged, not raised.
    run_command(tmp.path(), "definitely-not-a-real-binary-xyz", &sample_change()).await?;
    Ok(())
}
