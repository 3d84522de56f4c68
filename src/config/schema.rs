//! Logger options.
//!
//! This module defines the configuration a logger is built from. `Options`
//! derives Serde traits for loading from config files and renders itself as
//! JSON for diagnostics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::Level;

pub const CONSOLE_FORMAT: &str = "console";
pub const JSON_FORMAT: &str = "json";

/// Everything needed to build a `Logger`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Where records go. `stdout`, `stderr`, or a file path.
    pub output_paths: Vec<String>,

    /// Where the logger reports its own failures.
    pub error_output_paths: Vec<String>,

    /// Minimum severity name (debug, info, warn, error, dpanic, panic, fatal).
    pub level: String,

    /// `console` or `json`, case-insensitive.
    pub format: String,

    /// Omit the caller location from records.
    pub disable_caller: bool,

    /// Omit stack traces, even at panic severity.
    pub disable_stacktrace: bool,

    /// Color level labels in console format.
    pub enable_color: bool,

    /// Development mode: dpanic records panic after being written.
    pub development: bool,

    /// Root name of the logger.
    pub name: String,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured level, or `info` when it does not parse.
    pub fn level_or_default(&self) -> Level {
        self.level.parse().unwrap_or(Level::Info)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_paths: vec!["stdout".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            level: Level::Info.to_string(),
            format: CONSOLE_FORMAT.to_string(),
            disable_caller: false,
            disable_stacktrace: false,
            enable_color: false,
            development: false,
            name: String::new(),
        }
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serde_json::to_string(self).unwrap_or_default())
    }
}

/// Record encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Console,
    Json,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Console => CONSOLE_FORMAT,
            Format::Json => JSON_FORMAT,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid log format: {0:?}")]
pub struct ParseFormatError(pub String);

impl FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            CONSOLE_FORMAT => Ok(Format::Console),
            JSON_FORMAT => Ok(Format::Json),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}
