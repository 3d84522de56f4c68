//! The leveled-logging engine behind every `Logger`.
//!
//! # Data Flow
//! ```text
//! Logger call
//!     → enabled(level)          atomic threshold
//!     → check(level, message)   threshold + sampler
//!     → write(entry, fields)    encoder → output sinks
//!                                  ↳ write failures → error-output sinks
//!     → sync()                  flush + fsync every sink
//! ```
//!
//! # Design Decisions
//! - One `Backend` is shared (`Arc`) by a logger and everything derived from
//!   it; derivation never copies sinks or counters
//! - Records above `Error` sync the sinks before returning, since a panic or
//!   exit usually follows them
//! - Write failures never reach the caller; they are reported on the
//!   error-output sinks

pub(crate) mod sampler;
pub(crate) mod sink;

use std::io;

use chrono::Local;

use crate::encoder::{encode_time, Encoder, Entry};
use crate::field::Field;
use crate::level::{AtomicLevel, Level};

use sampler::Sampler;
use sink::MultiSink;

pub(crate) struct Backend {
    pub(crate) level: AtomicLevel,
    pub(crate) encoder: Box<dyn Encoder>,
    pub(crate) sampler: Option<Sampler>,
    pub(crate) out: MultiSink,
    pub(crate) err_out: MultiSink,
    pub(crate) add_caller: bool,
    /// Records at or above this level carry a stack trace.
    pub(crate) stack_level: Option<Level>,
    pub(crate) development: bool,
}

impl Backend {
    pub(crate) fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    /// Threshold and sampling decision for one record.
    pub(crate) fn check(&self, level: Level, message: &str) -> bool {
        if !self.enabled(level) {
            return false;
        }
        match &self.sampler {
            Some(sampler) => sampler.check(level, message),
            None => true,
        }
    }

    pub(crate) fn wants_stack(&self, level: Level) -> bool {
        self.stack_level.is_some_and(|threshold| level >= threshold)
    }

    pub(crate) fn write(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) {
        let buf = self.encoder.encode(entry, context, fields);
        if let Err(e) = self.out.write_all(&buf) {
            self.report("write error", &e);
        }
        if entry.level > Level::Error {
            let _ = self.sync();
        }
    }

    pub(crate) fn sync(&self) -> io::Result<()> {
        let out = self.out.sync();
        let err_out = self.err_out.sync();
        out.and(err_out)
    }

    fn report(&self, what: &str, err: &io::Error) {
        let now = encode_time(&Local::now());
        let line = format!("{} {}: {}\n", now.as_str().unwrap_or_default(), what, err);
        let _ = self.err_out.write_all(line.as_bytes());
    }
}
