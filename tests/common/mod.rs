//! Shared utilities for integration testing.

use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use leveled_log::{Logger, Options};

/// A JSON logger writing to a file in its own temporary directory.
pub struct TempLog {
    _dir: TempDir,
    pub path: PathBuf,
    pub logger: Logger,
}

impl TempLog {
    /// Build from `opts`, overriding the format and the output paths.
    pub fn new(opts: Options) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.log");
        let opts = Options {
            format: "json".to_string(),
            output_paths: vec![path.to_string_lossy().into_owned()],
            ..opts
        };
        let logger = Logger::new(&opts);
        Self {
            _dir: dir,
            path,
            logger,
        }
    }

    /// Flush and parse every record written so far.
    pub fn records(&self) -> Vec<Value> {
        self.logger.flush();
        read_records(&self.path)
    }
}

#[allow(dead_code)]
pub fn read_records(path: &PathBuf) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
