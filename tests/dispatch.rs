// SPDX-License-Identifier: MIT OR Apache-2.0
use filewise::diagnostics::{Diagnostic, InMemorySink, set_diagnostic_sink};
use filewise::{BasicHandler, Handler, Level, Logger, RotatingHandler, get_logger};
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

fn file_handler(dir: &std::path::Path, name: &str, template: &str) -> Arc<BasicHandler> {
    let handler = Arc::new(BasicHandler::new(dir, name).unwrap());
    handler.set_format_string(template).unwrap();
    handler
}

#[test]
fn test_shared_handler_receives_from_every_logger() {
    let dir = tempfile::tempdir().unwrap();
    let shared = file_handler(dir.path(), "shared.log", "%(name) %(message)");
    let a = get_logger("dispatch-shared-a");
    let b = get_logger("dispatch-shared-b");
    a.add_handler(shared.clone());
    b.add_handler(shared.clone());

    a.warning(format_args!("from a"));
    b.error(format_args!("from b"));
    assert_eq!(
        fs::read_to_string(dir.path().join("shared.log")).unwrap(),
        "dispatch-shared-a from a\ndispatch-shared-b from b\n"
    );

    // detaching from one logger leaves the other attached
    a.remove_handler(shared.id());
    a.error(format_args!("dropped"));
    b.debug(format_args!("kept"));
    assert_eq!(
        fs::read_to_string(dir.path().join("shared.log")).unwrap(),
        "dispatch-shared-a from a\ndispatch-shared-b from b\ndispatch-shared-b kept\n"
    );
}

#[test]
fn test_handlers_run_in_attachment_order() {
    let dir = tempfile::tempdir().unwrap();
    let handler = file_handler(dir.path(), "order.log", "%(message)");
    let second = Arc::new(BasicHandler::new(dir.path(), "order.log").unwrap());
    second.set_format_string("second:%(message)").unwrap();
    let logger = Logger::new("order");
    logger.add_handler(handler);
    logger.add_handler(second);

    logger.debug(format_args!("x"));
    assert_eq!(
        fs::read_to_string(dir.path().join("order.log")).unwrap(),
        "x\nsecond:x\n"
    );
}

#[test]
fn test_error_reports_its_own_line() {
    let dir = tempfile::tempdir().unwrap();
    let handler = file_handler(dir.path(), "line.log", "%(fileName) %(lineNo) %(funcName)");
    let logger = Logger::new("line");
    logger.add_handler(handler);

    let line = line!() + 1;
    logger.error(format_args!("here"));
    assert_eq!(
        fs::read_to_string(dir.path().join("line.log")).unwrap(),
        format!("dispatch.rs {line} ???\n")
    );
}

#[test]
fn test_macro_reports_function() {
    let dir = tempfile::tempdir().unwrap();
    let handler = file_handler(dir.path(), "func.log", "%(lineNo) %(funcName)");
    let logger = Logger::new("func");
    logger.add_handler(handler);

    let line = line!() + 1;
    filewise::error!(logger, "here");
    assert_eq!(
        fs::read_to_string(dir.path().join("func.log")).unwrap(),
        format!("{line} dispatch::test_macro_reports_function\n")
    );
}

#[test]
fn test_no_call_site_reports_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let handler = file_handler(
        dir.path(),
        "unknown.log",
        "%(pathName)|%(fileName)|%(funcName)|%(lineNo)",
    );
    let logger = Logger::new("unknown");
    logger.add_handler(handler);
    logger.log(Level::Error, None, format_args!("x"));
    assert_eq!(
        fs::read_to_string(dir.path().join("unknown.log")).unwrap(),
        "???|???|???|???\n"
    );
}

#[test]
fn test_concurrent_writers_keep_lines_intact() {
    let dir = tempfile::tempdir().unwrap();
    let handler = Arc::new(RotatingHandler::new(dir.path(), "busy.log").unwrap());
    handler.set_format_string("%(name) %(message)").unwrap();
    handler.set_max_file_size(4096).unwrap();
    handler.set_backup_count(0);

    let threads: Vec<_> = (0..8)
        .map(|t| {
            let handler = handler.clone();
            std::thread::spawn(move || {
                let logger = Logger::new(&format!("writer-{t}"));
                logger.add_handler(handler);
                for i in 0..200 {
                    logger.error(format_args!("message {i:04} {}", "x".repeat(20)));
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let mut seen = HashSet::new();
    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.len() as u64 <= 4096, "{} overflowed", path.display());
        for line in text.lines() {
            let parts: Vec<&str> = line.split(' ').collect();
            assert_eq!(parts.len(), 4, "torn line {line:?}");
            assert!(parts[0].starts_with("writer-"));
            assert_eq!(parts[3], "x".repeat(20));
            assert!(seen.insert(format!("{} {}", parts[0], parts[2])), "duplicate {line:?}");
        }
    }
    assert_eq!(seen.len(), 8 * 200);
}

/// Serializes tests that swap the process-wide sink.
static SINK_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn test_write_failures_go_to_diagnostics() {
    let _guard = SINK_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let broken = file_handler(dir.path(), "broken.log", "%(message)");
    broken.close();
    let working = file_handler(dir.path(), "working.log", "%(message)");
    let logger = Logger::new("diagnosed");
    logger.add_handler(broken.clone());
    logger.add_handler(working);

    let sink = Arc::new(InMemorySink::new());
    let previous = set_diagnostic_sink(sink.clone());
    logger.error(format_args!("still delivered"));
    set_diagnostic_sink(previous);

    assert_eq!(
        fs::read_to_string(dir.path().join("working.log")).unwrap(),
        "still delivered\n"
    );
    let reports: Vec<Diagnostic> = sink
        .drain()
        .into_iter()
        .filter(|d| matches!(d, Diagnostic::WriteFailed { logger, .. } if logger == "diagnosed"))
        .collect();
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        &reports[0],
        Diagnostic::WriteFailed { handler, .. } if *handler == broken.id()
    ));
}
