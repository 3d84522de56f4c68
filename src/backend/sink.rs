//! Output destinations.
//!
//! `stdout` and `stderr` name the process streams; any other path is a file
//! opened for appending and created when missing.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Failure to open one of the configured paths.
#[derive(Debug, Error)]
#[error("can't open sink {path:?}: {source}")]
pub struct SinkError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// A single destination.
#[derive(Debug)]
pub(crate) enum Sink {
    Stdout,
    Stderr,
    File { path: PathBuf, file: Mutex<File> },
}

impl Sink {
    pub(crate) fn open(path: &str) -> Result<Self, SinkError> {
        match path {
            "stdout" => Ok(Sink::Stdout),
            "stderr" => Ok(Sink::Stderr),
            _ => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| SinkError {
                        path: path.to_string(),
                        source,
                    })?;
                Ok(Sink::File {
                    path: PathBuf::from(path),
                    file: Mutex::new(file),
                })
            }
        }
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().write_all(buf),
            Sink::Stderr => io::stderr().lock().write_all(buf),
            Sink::File { file, .. } => file
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_all(buf),
        }
    }

    fn sync(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::File { file, .. } => {
                let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
                file.flush()?;
                file.sync_all()
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Sink::Stdout => "stdout".to_string(),
            Sink::Stderr => "stderr".to_string(),
            Sink::File { path, .. } => path.display().to_string(),
        }
    }
}

/// Fan-out over several sinks.
///
/// Every sink gets every write even when an earlier one fails; the first
/// error is returned.
#[derive(Debug, Default)]
pub(crate) struct MultiSink {
    sinks: Vec<Sink>,
}

impl MultiSink {
    pub(crate) fn open(paths: &[String]) -> Result<Self, SinkError> {
        let sinks = paths
            .iter()
            .map(|p| Sink::open(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sinks })
    }

    pub(crate) fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write_all(buf) {
                let e = io::Error::new(e.kind(), format!("{}: {}", sink.describe(), e));
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub(crate) fn sync(&self) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.sync() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sinks.len()
    }
}
