//! Record encoding.
//!
//! # Data Flow
//! ```text
//! Entry (level, time, name, caller, message, stack)
//!     + logger context fields
//!     + call-site fields
//!     → Encoder (json | console)
//!     → one line of bytes handed to the sinks
//! ```
//!
//! # Design Decisions
//! - Key names and primitive encoders live in `EncoderConfig`, so both
//!   formats render timestamps, durations and callers identically
//! - Values are rendered through `serde_json::Value` for correct escaping

mod console;
mod json;
mod primitives;

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;
pub use primitives::{encode_duration_millis, encode_short_caller, encode_time};

use std::borrow::Cow;
use std::time::Duration;

use base64::Engine as _;
use chrono::{DateTime, Local};
use serde_json::Value;

use crate::field::{Field, FieldValue};
use crate::level::Level;

pub type TimeEncoder = fn(&DateTime<Local>) -> Value;
pub type DurationEncoder = fn(Duration) -> Value;
pub type CallerEncoder = fn(&Caller) -> String;

/// Source location of a logging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl From<&'static std::panic::Location<'static>> for Caller {
    fn from(location: &'static std::panic::Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// Everything about a record except its fields.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub level: Level,
    pub time: DateTime<Local>,
    pub logger_name: &'a str,
    pub message: &'a str,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}

/// How level labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoder {
    /// `INFO`
    Capital,
    /// `INFO` wrapped in an ANSI color escape.
    CapitalColor,
}

impl LevelEncoder {
    pub fn encode(self, level: Level) -> Cow<'static, str> {
        match self {
            LevelEncoder::Capital => Cow::Borrowed(level.capital_str()),
            LevelEncoder::CapitalColor => {
                let color = match level {
                    Level::Debug => 35,
                    Level::Info => 34,
                    Level::Warn => 33,
                    Level::Error | Level::DPanic | Level::Panic | Level::Fatal => 31,
                };
                Cow::Owned(format!("\x1b[{}m{}\x1b[0m", color, level.capital_str()))
            }
        }
    }
}

/// Key names and primitive encoders shared by every format.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub message_key: &'static str,
    pub level_key: &'static str,
    pub time_key: &'static str,
    pub name_key: &'static str,
    pub caller_key: &'static str,
    pub stacktrace_key: &'static str,
    pub line_ending: &'static str,
    pub encode_level: LevelEncoder,
    pub encode_time: TimeEncoder,
    pub encode_duration: DurationEncoder,
    pub encode_caller: CallerEncoder,
}

impl EncoderConfig {
    /// The record layout used by every logger this crate builds.
    pub fn standard(encode_level: LevelEncoder) -> Self {
        Self {
            message_key: "message",
            level_key: "level",
            time_key: "timestamp",
            name_key: "logger",
            caller_key: "call",
            stacktrace_key: "stacktrace",
            line_ending: "\n",
            encode_level,
            encode_time,
            encode_duration: encode_duration_millis,
            encode_caller: encode_short_caller,
        }
    }

    /// Render a field value, applying the configured primitive encoders.
    pub fn encode_value(&self, value: &FieldValue) -> Value {
        match value {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Uint(u) => Value::from(*u),
            FieldValue::Float(f) => encode_float(*f),
            FieldValue::Duration(d) => (self.encode_duration)(*d),
            FieldValue::Time(t) => (self.encode_time)(t),
            FieldValue::Binary(bytes) => {
                Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            FieldValue::Json(v) => v.clone(),
            FieldValue::Error(e) => Value::String(e.clone()),
            FieldValue::Array(items) => {
                Value::Array(items.iter().map(|v| self.encode_value(v)).collect())
            }
        }
    }
}

fn encode_float(f: f64) -> Value {
    if f.is_nan() {
        Value::String("NaN".to_string())
    } else if f.is_infinite() {
        Value::String(if f > 0.0 { "+Inf" } else { "-Inf" }.to_string())
    } else {
        Value::from(f)
    }
}

/// Turns a record into bytes.
pub trait Encoder: Send + Sync {
    /// Encode one record. `context` holds the logger's accumulated fields and
    /// is written before the call-site `fields`.
    fn encode(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) -> Vec<u8>;
}

/// Incremental writer for a flat JSON object.
pub(crate) struct ObjectWriter {
    buf: Vec<u8>,
    empty: bool,
}

impl ObjectWriter {
    pub(crate) fn new() -> Self {
        Self {
            buf: vec![b'{'],
            empty: true,
        }
    }

    pub(crate) fn add_str(&mut self, key: &str, value: &str) {
        self.add(key, &Value::String(value.to_string()));
    }

    pub(crate) fn add(&mut self, key: &str, value: &Value) {
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
        // Writing a str or a Value into a Vec cannot fail.
        let _ = serde_json::to_writer(&mut self.buf, key);
        self.buf.push(b':');
        let _ = serde_json::to_writer(&mut self.buf, value);
    }

    pub(crate) fn add_fields(&mut self, config: &EncoderConfig, fields: &[Field]) {
        for field in fields {
            self.add(&field.key, &config.encode_value(&field.value));
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.empty
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.buf.push(b'}');
        self.buf
    }
}
