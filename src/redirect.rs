//! Redirect of the process-wide `tracing` and `log` output.
//!
//! # Data Flow
//! ```text
//! log::info!(..)  → LogTracer ─┐
//! tracing::info!(..) ──────────┴→ Registry → StdLogBridge → TARGET logger
//! ```
//!
//! # Design Decisions
//! - The subscriber is installed once per process; later loggers only swap
//!   the target, so the most recently built logger receives the records
//! - An existing global subscriber is left alone

use std::fmt;
use std::sync::{Arc, Once};

use arc_swap::ArcSwapOption;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{self, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::encoder::Caller;
use crate::field::{self, Field};
use crate::level::Level;
use crate::logger::Logger;

static TARGET: ArcSwapOption<Logger> = ArcSwapOption::const_empty();
static INSTALL: Once = Once::new();

/// Send `tracing` events and `log` records to `logger` from now on.
pub fn redirect_std_log(logger: &Logger) {
    TARGET.store(Some(Arc::new(logger.clone())));
    INSTALL.call_once(|| {
        let _ = tracing_subscriber::registry().with(StdLogBridge).try_init();
    });
}

/// The logger currently receiving redirected records.
pub fn target() -> Option<Logger> {
    TARGET.load_full().map(|logger| (*logger).clone())
}

/// Forwards every event to the redirect target.
pub struct StdLogBridge;

impl<S: Subscriber> Layer<S> for StdLogBridge {
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        let Some(logger) = TARGET.load_full() else {
            return;
        };
        let meta = event.metadata();
        let level = map_level(*meta.level());
        if !logger.enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        // Records from the `log` crate carry their origin in `log.*` fields.
        let caller = match (visitor.file, visitor.line) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => meta
                .file()
                .zip(meta.line())
                .map(|(file, line)| Caller::new(file, line)),
        };
        let message = visitor.message.unwrap_or_default();
        logger.log_at(level, &message, &visitor.fields, caller);
    }
}

fn map_level(level: tracing::Level) -> Level {
    match level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warn,
        _ => Level::Error,
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    file: Option<String>,
    line: Option<u32>,
    fields: Vec<Field>,
}

impl EventVisitor {
    fn skip(name: &str) -> bool {
        name.starts_with("log.")
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, f: &TracingField, value: &str) {
        match f.name() {
            "message" => self.message = Some(value.to_string()),
            "log.file" => self.file = Some(value.to_string()),
            name if Self::skip(name) => {}
            name => self.fields.push(field::string(name, value)),
        }
    }

    fn record_u64(&mut self, f: &TracingField, value: u64) {
        match f.name() {
            "log.line" => self.line = u32::try_from(value).ok(),
            name if Self::skip(name) => {}
            name => self.fields.push(field::uint64(name, value)),
        }
    }

    fn record_i64(&mut self, f: &TracingField, value: i64) {
        if !Self::skip(f.name()) {
            self.fields.push(field::int64(f.name(), value));
        }
    }

    fn record_f64(&mut self, f: &TracingField, value: f64) {
        if !Self::skip(f.name()) {
            self.fields.push(field::float64(f.name(), value));
        }
    }

    fn record_bool(&mut self, f: &TracingField, value: bool) {
        if !Self::skip(f.name()) {
            self.fields.push(field::bool(f.name(), value));
        }
    }

    fn record_error(&mut self, f: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(field::named_err(f.name(), value));
    }

    fn record_debug(&mut self, f: &TracingField, value: &dyn fmt::Debug) {
        match f.name() {
            "message" => self.message = Some(format!("{value:?}")),
            name if Self::skip(name) => {}
            name => self.fields.push(field::string(name, format!("{value:?}"))),
        }
    }
}
