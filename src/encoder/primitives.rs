//! Primitive encoders for timestamps, durations and caller locations.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::Value;

use super::Caller;

/// Layout of every rendered timestamp: millisecond precision, 24-hour clock.
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS.mmm`.
pub fn encode_time(t: &DateTime<Local>) -> Value {
    Value::String(t.format(TIME_LAYOUT).to_string())
}

/// Render a duration as a floating-point number of milliseconds.
pub fn encode_duration_millis(d: Duration) -> Value {
    Value::from(d.as_nanos() as f64 / 1_000_000.0)
}

/// Render a caller as `dir/file.rs:line`, keeping only the last directory.
pub fn encode_short_caller(caller: &Caller) -> String {
    let file = caller.file.replace('\\', "/");
    let short = match file.rfind('/') {
        Some(last) => match file[..last].rfind('/') {
            Some(prev) => &file[prev + 1..],
            None => &file[..],
        },
        None => &file[..],
    };
    format!("{}:{}", short, caller.line)
}
