//! Panic, fatal and verbosity misuse.

use std::panic::{self, AssertUnwindSafe};
use std::process::{Command, Stdio};

use leveled_log::{field, Logger, Options};

mod common;

use common::{read_records, TempLog};

const FATAL_CHILD_ENV: &str = "LEVELED_LOG_FATAL_CHILD";

#[test]
fn test_fatal_exits_with_status_one() {
    if let Ok(path) = std::env::var(FATAL_CHILD_ENV) {
        let logger = Logger::new(&Options {
            format: "json".to_string(),
            output_paths: vec![path],
            ..Options::default()
        });
        logger.fatal("shutting down", &[field::int("code", 7)]);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fatal.log");
    let status = Command::new(std::env::current_exe().unwrap())
        .args(["--exact", "test_fatal_exits_with_status_one", "--test-threads=1"])
        .env(FATAL_CHILD_ENV, &path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let records = read_records(&path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "FATAL");
    assert_eq!(records[0]["message"], "shutting down");
    assert_eq!(records[0]["code"], 7);
    assert!(records[0]["stacktrace"].is_string());
}

#[test]
fn test_panic_writes_before_unwinding() {
    let log = TempLog::new(Options::default());
    let logger = log.logger.clone();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        logger.panicw("invariant broken", &leveled_log::kv!["slot", 3]);
    }));

    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("invariant broken"));

    let records = log.records();
    assert_eq!(records[0]["level"], "PANIC");
    assert_eq!(records[0]["slot"], 3);
}

#[test]
fn test_panic_happens_even_when_filtered() {
    let log = TempLog::new(Options {
        level: "fatal".to_string(),
        ..Options::default()
    });
    let logger = log.logger.clone();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        logger.panicf(format_args!("filtered {}", "panic"));
    }));
    assert!(result.is_err());
    assert!(log.records().is_empty());
}

#[test]
#[should_panic(expected = "log level error: valid log level is [0, 1]")]
fn test_negative_verbosity_panics() {
    let log = TempLog::new(Options::default());
    let _ = log.logger.v(-1);
}

#[test]
#[should_panic(expected = "log level error: valid log level is [0, 1]")]
fn test_large_verbosity_panics() {
    let log = TempLog::new(Options::default());
    let _ = log.logger.v(2);
}
