use std::error::Error;
use std::fs;

use tempfile::TempDir;
use watchcmd::config::{EXAMPLE_CONFIG, load_and_validate, write_example_config};

type TestResult = Result<(), Box<dyn Error>>;

fn load_str(contents: &str) -> Result<watchcmd::config::ConfigFile, Box<dyn Error>> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("Watchcmd.toml");
    fs::write(&path, contents)?;
    Ok(load_and_validate(&path)?)
}

#[test]
fn full_config_parses() -> TestResult {
    let cfg = load_str(
        r#"
version = 1

[monitor]
types = [".go", ".mod"]
events = ["write", "create"]
includeDirs = [". *"]
exceptDirs = ["vendor"]

[command]
exec = ["go build", "echo {{file}}"]
delayMillSecond = 2000

[notifier]
callUrl = "http://127.0.0.1:8080/changed"
"#,
    )?;

    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.monitor.types, vec![".go", ".mod"]);
    assert_eq!(cfg.monitor.events, vec!["write", "create"]);
    assert_eq!(cfg.monitor.include_dirs, vec![". *"]);
    assert_eq!(cfg.monitor.except_dirs, vec!["vendor"]);
    assert_eq!(cfg.command.exec.len(), 2);
    assert_eq!(cfg.command.delay_mill_second, 2000);
    assert_eq!(
        cfg.notifier.effective_call_url(),
        Some("http://127.0.0.1:8080/changed")
    );
    Ok(())
}

#[test]
fn empty_config_gets_defaults() -> TestResult {
    let cfg = load_str("")?;

    assert_eq!(cfg.version, 1);
    assert!(cfg.monitor.types.is_empty());
    assert!(cfg.monitor.events.is_empty());
    assert!(cfg.monitor.include_dirs.is_empty());
    assert!(cfg.monitor.except_dirs.is_empty());
    assert!(cfg.command.exec.is_empty());
    assert_eq!(cfg.command.delay_mill_second, 0);
    assert_eq!(cfg.notifier.effective_call_url(), None);
    Ok(())
}

#[test]
fn empty_call_url_is_disabled() -> TestResult {
    let cfg = load_str("[notifier]\ncallUrl = \"\"\n")?;
    assert_eq!(cfg.notifier.effective_call_url(), None);
    Ok(())
}

#[test]
fn unsupported_version_is_fatal() {
    let err = load_str("version = 2\n").unwrap_err();
    assert!(err.to_string().contains("version"));
}

#[test]
fn unknown_event_kind_is_fatal() {
    let err = load_str("[monitor]\nevents = [\"touched\"]\n").unwrap_err();
    assert!(err.to_string().contains("touched"));
}

#[test]
fn malformed_include_rule_is_fatal() {
    assert!(load_str("[monitor]\nincludeDirs = [\"src lib\"]\n").is_err());
    assert!(load_str("[monitor]\nincludeDirs = [\"/abs\"]\n").is_err());
}

#[test]
fn root_exclude_is_fatal() {
    assert!(load_str("[monitor]\nexceptDirs = [\".\"]\n").is_err());
}

#[test]
fn missing_config_file_is_fatal() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("missing.toml");
    assert!(load_and_validate(&path).is_err());
}

#[test]
fn example_config_loads_and_validates() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("Watchcmd.toml");
    write_example_config(&path)?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.monitor.include_dirs, vec![". *"]);
    assert_eq!(cfg.notifier.effective_call_url(), None);
    Ok(())
}

#[test]
fn init_refuses_to_overwrite() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("Watchcmd.toml");
    fs::write(&path, EXAMPLE_CONFIG)?;

    assert!(write_example_config(&path).is_err());
    Ok(())
}
