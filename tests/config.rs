// SPDX-License-Identifier: MIT OR Apache-2.0
use filewise::{Config, ConfigError, Handler, Level, Registry};
use std::collections::HashMap;
use std::fs;

fn toml_for(dir: &std::path::Path, loggers: &str) -> String {
    format!(
        r#"
[handlers.rolling]
handlerType = "RotatingHandler"
fileDir = {dir:?}
fileName = "rolling.log"
formatString = "%(name) %(levelName) %(message)"
maxFileSize = 4096
backupCount = 3

[handlers.daily]
handlerType = "TimeRotatingHandler"
fileDir = {dir:?}
fileName = "daily.log"
formatString = "%(message)"
logLevel = "ERROR"
when = "1d"
backupCount = 0

{loggers}
"#,
        dir = dir.display().to_string(),
    )
}

#[test]
fn test_apply_wires_loggers() {
    let dir = tempfile::tempdir().unwrap();
    let text = toml_for(
        dir.path(),
        r#"[loggers]
config-wired = ["rolling", "daily"]"#,
    );
    let config = Config::from_toml_str(&text).unwrap();
    let handlers = config.apply().unwrap();
    assert_eq!(handlers.len(), 2);
    assert_eq!(handlers["daily"].log_level(), Level::Error);

    let logger = Registry::global().logger("config-wired");
    assert_eq!(logger.handlers().len(), 2);
    logger.warning(format_args!("w"));
    logger.error(format_args!("e"));

    assert_eq!(
        fs::read_to_string(dir.path().join("rolling.log")).unwrap(),
        "config-wired WARNING w\nconfig-wired ERROR e\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("daily.log")).unwrap(),
        "e\n"
    );
}

#[test]
fn test_unknown_handler_reference_wires_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let text = toml_for(
        dir.path(),
        r#"[loggers]
config-partial-ok = ["rolling"]
config-partial-bad = ["rolling", "missing"]"#,
    );
    let config = Config::from_toml_str(&text).unwrap();
    assert!(matches!(
        config.apply(),
        Err(ConfigError::UnknownHandler { handler, .. }) if handler == "missing"
    ));
    assert!(Registry::global().logger("config-partial-ok").handlers().is_empty());
    assert!(!dir.path().join("rolling.log").exists());
}

#[test]
fn test_bad_value_wires_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let text = format!(
        r#"
[handlers.good]
handlerType = "BasicHandler"
fileDir = {dir:?}
fileName = "good.log"

[handlers.bad]
handlerType = "TimeRotatingHandler"
fileDir = {dir:?}
fileName = "bad.log"
when = "1999dddd"

[loggers]
config-bad-value = ["good", "bad"]
"#,
        dir = dir.path().display().to_string(),
    );
    let config = Config::from_toml_str(&text).unwrap();
    assert!(matches!(
        config.apply(),
        Err(ConfigError::Handler { handler, source: filewise::Error::InvalidArgument(_) }) if handler == "bad"
    ));
    assert!(Registry::global().logger("config-bad-value").handlers().is_empty());
}

#[test]
fn test_negative_backup_count_from_properties() {
    let dir = tempfile::tempdir().unwrap();
    let mut handlers = HashMap::new();
    handlers.insert(
        "rotating".to_string(),
        HashMap::from([
            ("handlerType".to_string(), "RotatingHandler".to_string()),
            ("fileDir".to_string(), dir.path().display().to_string()),
            ("fileName".to_string(), "neg.log".to_string()),
            ("backupCount".to_string(), "-1".to_string()),
        ]),
    );
    let loggers = HashMap::from([("config-negative".to_string(), vec!["rotating".to_string()])]);
    let config = Config::from_properties(&handlers, &loggers).unwrap();
    assert!(matches!(
        config.apply(),
        Err(ConfigError::Handler {
            source: filewise::Error::InvalidArgument(_),
            ..
        })
    ));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.toml");
    fs::write(
        &path,
        toml_for(
            dir.path(),
            r#"[loggers]
config-loaded = ["rolling"]"#,
        ),
    )
    .unwrap();
    let config = Config::load(&path).unwrap();
    assert_eq!(config.handlers.len(), 2);
    assert_eq!(config.loggers["config-loaded"], vec!["rolling".to_string()]);
    assert_eq!(config.handlers["rolling"].max_file_size, Some(4096));
}
