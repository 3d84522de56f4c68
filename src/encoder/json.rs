//! One JSON object per record.

use super::{Encoder, EncoderConfig, Entry, ObjectWriter};
use crate::field::Field;

/// Encodes records as single-line JSON objects.
#[derive(Debug, Clone)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) -> Vec<u8> {
        let cfg = &self.config;
        let mut obj = ObjectWriter::new();

        obj.add_str(cfg.level_key, &cfg.encode_level.encode(entry.level));
        obj.add(cfg.time_key, &(cfg.encode_time)(&entry.time));
        if !entry.logger_name.is_empty() {
            obj.add_str(cfg.name_key, entry.logger_name);
        }
        if let Some(caller) = &entry.caller {
            obj.add_str(cfg.caller_key, &(cfg.encode_caller)(caller));
        }
        obj.add_str(cfg.message_key, entry.message);
        obj.add_fields(cfg, context);
        obj.add_fields(cfg, fields);
        if let Some(stack) = &entry.stack {
            obj.add_str(cfg.stacktrace_key, stack);
        }

        let mut line = obj.finish();
        line.extend_from_slice(cfg.line_ending.as_bytes());
        line
    }
}
