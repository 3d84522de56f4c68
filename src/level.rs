//! Severity levels.
//!
//! # Responsibilities
//! - Define the ordered severity vocabulary
//! - Parse level names from configuration
//! - Provide a shared, runtime-adjustable threshold
//!
//! # Design Decisions
//! - Numeric values follow the classic leveled-logger layout (debug = -1,
//!   info = 0) so verbosity `n` maps to severity `-n`
//! - Parsing is case-insensitive and treats the empty string as `info`

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Severity of a log record.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Verbose output, usually disabled in production.
    Debug = -1,
    /// Default level.
    #[default]
    Info = 0,
    /// Worth a look, no action needed.
    Warn = 1,
    /// Something failed and should be investigated.
    Error = 2,
    /// Panics in development mode, logs as an error otherwise.
    DPanic = 3,
    /// Logs, then panics.
    Panic = 4,
    /// Logs, then exits the process with status 1.
    Fatal = 5,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    /// Lowercase name, as accepted by the parser.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Uppercase label used in emitted records.
    pub fn capital_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    /// Severity addressed by a `V(verbosity)` request.
    ///
    /// Returns `None` outside the supported range `[0, 1]`.
    pub fn from_verbosity(verbosity: i32) -> Option<Level> {
        match verbosity {
            0 => Some(Level::Info),
            1 => Some(Level::Debug),
            _ => None,
        }
    }

    fn from_i8(value: i8) -> Level {
        match value {
            i8::MIN..=-1 => Level::Debug,
            0 => Level::Info,
            1 => Level::Warn,
            2 => Level::Error,
            3 => Level::DPanic,
            4 => Level::Panic,
            _ => Level::Fatal,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "" | "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "dpanic" => Ok(Level::DPanic),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A threshold that can be changed while loggers are running.
///
/// Clones share the same underlying value, so a handle obtained from a
/// logger adjusts every logger built from the same backend.
#[derive(Debug, Clone)]
pub struct AtomicLevel {
    inner: Arc<AtomicI8>,
}

impl AtomicLevel {
    /// Create a handle set to `level`.
    pub fn new(level: Level) -> Self {
        Self {
            inner: Arc::new(AtomicI8::new(level as i8)),
        }
    }

    /// Current threshold.
    pub fn level(&self) -> Level {
        Level::from_i8(self.inner.load(Ordering::Relaxed))
    }

    /// Replace the threshold.
    pub fn set_level(&self, level: Level) {
        self.inner.store(level as i8, Ordering::Relaxed);
    }

    /// Whether records at `level` pass the threshold.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}
