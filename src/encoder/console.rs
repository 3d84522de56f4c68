//! Human-oriented, tab-separated records.

use super::{Encoder, EncoderConfig, Entry, ObjectWriter};
use crate::field::Field;

/// Encodes records as `time<TAB>LEVEL<TAB>name<TAB>caller<TAB>message<TAB>{fields}`.
///
/// Empty columns (no name, no caller, no fields) are skipped. A stack trace,
/// when present, follows on its own lines.
#[derive(Debug, Clone)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) -> Vec<u8> {
        let cfg = &self.config;
        let mut columns: Vec<String> = Vec::with_capacity(6);

        match (cfg.encode_time)(&entry.time) {
            serde_json::Value::String(s) => columns.push(s),
            other => columns.push(other.to_string()),
        }
        columns.push(cfg.encode_level.encode(entry.level).into_owned());
        if !entry.logger_name.is_empty() {
            columns.push(entry.logger_name.to_string());
        }
        if let Some(caller) = &entry.caller {
            columns.push((cfg.encode_caller)(caller));
        }
        columns.push(entry.message.to_string());

        let mut line = columns.join("\t").into_bytes();

        let mut obj = ObjectWriter::new();
        obj.add_fields(cfg, context);
        obj.add_fields(cfg, fields);
        if !obj.is_empty() {
            line.push(b'\t');
            line.extend_from_slice(&obj.finish());
        }

        if let Some(stack) = &entry.stack {
            line.push(b'\n');
            line.extend_from_slice(stack.trim_end().as_bytes());
        }
        line.extend_from_slice(cfg.line_ending.as_bytes());
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{Caller, LevelEncoder};
    use crate::field;
    use crate::level::Level;
    use chrono::Local;

    fn entry<'a>(message: &'a str) -> Entry<'a> {
        Entry {
            level: Level::Warn,
            time: Local::now(),
            logger_name: "worker",
            message,
            caller: Some(Caller::new("src/jobs/queue.rs", 7)),
            stack: None,
        }
    }

    #[test]
    fn test_console_columns() {
        let encoder = ConsoleEncoder::new(EncoderConfig::standard(LevelEncoder::Capital));
        let text = String::from_utf8(encoder.encode(
            &entry("queue is full"),
            &[],
            &[field::uint("depth", 512u32)],
        ))
        .unwrap();

        let columns: Vec<&str> = text.trim_end().split('\t').collect();
        assert_eq!(columns.len(), 6);
        assert_eq!(columns[1], "WARN");
        assert_eq!(columns[2], "worker");
        assert_eq!(columns[3], "jobs/queue.rs:7");
        assert_eq!(columns[4], "queue is full");
        assert_eq!(columns[5], "{\"depth\":512}");
    }

    #[test]
    fn test_console_without_fields() {
        let encoder = ConsoleEncoder::new(EncoderConfig::standard(LevelEncoder::Capital));
        let text = String::from_utf8(encoder.encode(&entry("idle"), &[], &[])).unwrap();
        assert!(text.ends_with("\tidle\n"));
    }

    #[test]
    fn test_console_color_and_stack() {
        let encoder = ConsoleEncoder::new(EncoderConfig::standard(LevelEncoder::CapitalColor));
        let mut e = entry("crashed");
        e.stack = Some("   0: main\n".to_string());
        let text = String::from_utf8(encoder.encode(&e, &[], &[])).unwrap();
        assert!(text.contains("\x1b[33mWARN\x1b[0m"));
        assert!(text.ends_with("crashed\n   0: main\n"));
    }
}
