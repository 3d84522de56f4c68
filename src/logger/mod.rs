//! The public logging surface.
//!
//! # Responsibilities
//! - Leveled methods in three shapes: fields (`info`), formatted (`infof`)
//!   and loose key/value (`infow`)
//! - Level-gated views via `v()`
//! - Derived loggers (`with`, `with_values`, `with_name`)
//! - Terminal behavior for panic, dpanic and fatal records
//!
//! # Design Decisions
//! - `Logger` is a cheap handle: an `Arc` to the backend plus the name and
//!   context fields it adds; deriving never mutates the receiver
//! - Call sites are captured with `#[track_caller]`, so the reported caller
//!   is the code using the logger, never this module
//! - Formatting and key/value coercion only happen after the level check

mod build;
mod info;

pub use build::{BuildError, SinkError};
pub use info::{InfoLogger, DISABLED};

use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;

use chrono::Local;

use crate::backend::Backend;
use crate::context::{self, Context};
use crate::encoder::{Caller, Entry};
use crate::field::Field;
use crate::kv::{self, Kv};
use crate::level::{AtomicLevel, Level};

/// A structured, leveled logger.
///
/// Cloning is cheap and clones share sinks, sampling state and the level.
#[derive(Clone)]
pub struct Logger {
    backend: Arc<Backend>,
    name: Arc<str>,
    context: Arc<[Field]>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.backend.level.level())
            .field("context", &self.context.len())
            .finish()
    }
}

macro_rules! level_methods {
    ($level:expr, $name:literal, $fields:ident, $formatted:ident, $keyed:ident) => {
        #[doc = concat!("Log a message with fields at ", $name, " level.")]
        #[track_caller]
        pub fn $fields(&self, msg: &str, fields: &[Field]) {
            self.log($level, msg, fields);
        }

        #[doc = concat!("Log a formatted message at ", $name, " level.")]
        #[track_caller]
        pub fn $formatted(&self, args: fmt::Arguments<'_>) {
            self.logf($level, args);
        }

        #[doc = concat!("Log a message with loose key/value pairs at ", $name, " level.")]
        #[track_caller]
        pub fn $keyed(&self, msg: &str, kv: &[Kv]) {
            self.logw($level, msg, kv);
        }
    };
}

impl Logger {
    /// Build a logger, panicking if the configured sinks cannot be opened or
    /// the format is unknown.
    ///
    /// See [`Logger::try_new`] for the fallible form.
    pub fn new(opts: &crate::config::Options) -> Logger {
        match build::build(opts) {
            Ok(logger) => logger,
            Err(e) => panic!("failed to build logger: {e}"),
        }
    }

    /// Build a logger from options.
    ///
    /// Redirects the process-wide `log`/`tracing` output to the new logger.
    pub fn try_new(opts: &crate::config::Options) -> Result<Logger, BuildError> {
        build::build(opts)
    }

    fn from_backend(backend: Arc<Backend>, name: &str) -> Logger {
        Logger {
            backend,
            name: Arc::from(name),
            context: Arc::from(Vec::new()),
        }
    }

    level_methods!(Level::Debug, "debug", debug, debugf, debugw);
    level_methods!(Level::Info, "info", info, infof, infow);
    level_methods!(Level::Warn, "warn", warn, warnf, warnw);
    level_methods!(Level::Error, "error", error, errorf, errorw);

    /// Log at panic level, then panic with the message.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        self.log(Level::Panic, msg, fields);
        panic!("{msg}");
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        let msg = args.to_string();
        self.log(Level::Panic, &msg, &[]);
        panic!("{msg}");
    }

    #[track_caller]
    pub fn panicw(&self, msg: &str, kv: &[Kv]) -> ! {
        self.logw(Level::Panic, msg, kv);
        panic!("{msg}");
    }

    /// Log at fatal level, flush, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.log(Level::Fatal, msg, fields);
        self.exit()
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.logf(Level::Fatal, args);
        self.exit()
    }

    #[track_caller]
    pub fn fatalw(&self, msg: &str, kv: &[Kv]) -> ! {
        self.logw(Level::Fatal, msg, kv);
        self.exit()
    }

    /// A view that logs at the severity addressed by `verbosity`.
    ///
    /// `0` is info and `1` is debug. The returned logger is disabled when the
    /// current level filters that severity out, so callers can test
    /// [`InfoLogger::enabled`] before building expensive arguments.
    ///
    /// # Panics
    /// When `verbosity` is outside `[0, 1]`.
    pub fn v(&self, verbosity: i32) -> InfoLogger {
        let Some(level) = Level::from_verbosity(verbosity) else {
            panic!("log level error: valid log level is [0, 1]");
        };
        if self.backend.enabled(level) {
            InfoLogger::live(level, self.clone())
        } else {
            InfoLogger::disabled()
        }
    }

    /// A logger that adds `fields` to every record.
    pub fn with(&self, fields: &[Field]) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }
        let mut context = Vec::with_capacity(self.context.len() + fields.len());
        context.extend_from_slice(&self.context);
        context.extend_from_slice(fields);
        Logger {
            backend: self.backend.clone(),
            name: self.name.clone(),
            context: Arc::from(context),
        }
    }

    /// A logger that adds loose key/value pairs to every record.
    #[track_caller]
    pub fn with_values(&self, kv: &[Kv]) -> Logger {
        let fields = kv::coerce(self, kv);
        self.with(&fields)
    }

    /// A logger whose name has `name` appended as a new segment.
    pub fn with_name(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        let name = if self.name.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.name, name)
        };
        Logger {
            backend: self.backend.clone(),
            name: Arc::from(name),
            context: self.context.clone(),
        }
    }

    /// Attach this logger to a context.
    pub fn with_context(&self, ctx: &Context) -> Context {
        context::attach_to_context(ctx, self.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle to the shared level; changes apply to every derived logger.
    pub fn atomic_level(&self) -> AtomicLevel {
        self.backend.level.clone()
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.backend.enabled(level)
    }

    /// Write out anything buffered. Call before the process exits.
    pub fn flush(&self) {
        let _ = self.backend.sync();
    }

    #[track_caller]
    fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        if !self.should_check(level) {
            return;
        }
        self.emit(level, msg, fields, self.caller());
    }

    #[track_caller]
    fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.should_check(level) {
            return;
        }
        let msg = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        self.emit(level, &msg, &[], self.caller());
    }

    #[track_caller]
    fn logw(&self, level: Level, msg: &str, kv: &[Kv]) {
        if !self.should_check(level) {
            return;
        }
        let fields = kv::coerce(self, kv);
        self.emit(level, msg, &fields, self.caller());
    }

    /// Records from dpanic up are always checked so their terminal action
    /// runs even when the level is filtered.
    fn should_check(&self, level: Level) -> bool {
        level >= Level::DPanic || self.backend.enabled(level)
    }

    #[track_caller]
    fn caller(&self) -> Option<Caller> {
        if self.backend.add_caller {
            Some(Caller::from(Location::caller()))
        } else {
            None
        }
    }

    /// Write a record built from an explicit caller.
    ///
    /// Used by the std redirect, whose records originate outside this crate.
    pub(crate) fn log_at(&self, level: Level, msg: &str, fields: &[Field], caller: Option<Caller>) {
        if !self.should_check(level) {
            return;
        }
        let caller = if self.backend.add_caller { caller } else { None };
        self.emit(level, msg, fields, caller);
    }

    /// Report misuse of the logging API itself.
    #[track_caller]
    pub(crate) fn diagnostic(&self, level: Level, msg: &str, fields: Vec<Field>) {
        if !self.should_check(level) {
            return;
        }
        self.emit(level, msg, &fields, self.caller());
    }

    fn emit(&self, level: Level, msg: &str, fields: &[Field], caller: Option<Caller>) {
        if self.backend.check(level, msg) {
            let stack = if self.backend.wants_stack(level) {
                Some(std::backtrace::Backtrace::force_capture().to_string())
            } else {
                None
            };
            let entry = Entry {
                level,
                time: Local::now(),
                logger_name: &self.name,
                message: msg,
                caller,
                stack,
            };
            self.backend.write(&entry, &self.context, fields);
        }

        if level == Level::DPanic && self.backend.development {
            panic!("{msg}");
        }
    }

    fn exit(&self) -> ! {
        self.flush();
        std::process::exit(1)
    }
}

/// Each write becomes one info record; the byte count is always reported as
/// fully written.
///
/// The message is the written text with exactly one trailing `\n` removed.
/// Every other byte, including interior newlines and a final `\r`, is kept
/// as given. Invalid UTF-8 is replaced.
impl io::Write for Logger {
    #[track_caller]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let msg = text.strip_suffix('\n').unwrap_or(&text);
        self.log(Level::Info, msg, &[]);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Logger::flush(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::field;
    use crate::kv;
    use serde_json::Value;
    use std::io::Write;
    use std::panic::AssertUnwindSafe;
    use std::path::PathBuf;

    struct Capture {
        _dir: tempfile::TempDir,
        path: PathBuf,
        logger: Logger,
    }

    impl Capture {
        fn new(opts: Options) -> Self {
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

        fn records(&self) -> Vec<Value> {
            self.logger.flush();
            std::fs::read_to_string(&self.path)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn debug_options() -> Options {
        Options {
            level: "debug".to_string(),
            ..Options::default()
        }
    }

    #[test]
    fn test_three_call_shapes() {
        let cap = Capture::new(debug_options());
        cap.logger.info("fields", &[field::int("x", 1)]);
        cap.logger.warnf(format_args!("formatted {}", 42));
        cap.logger.errorw("keyed", &kv!["user", "alice"]);

        let records = cap.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["message"], "fields");
        assert_eq!(records[0]["level"], "INFO");
        assert_eq!(records[0]["x"], 1);
        assert_eq!(records[1]["message"], "formatted 42");
        assert_eq!(records[1]["level"], "WARN");
        assert_eq!(records[2]["user"], "alice");
        assert_eq!(records[2]["level"], "ERROR");
    }

    #[test]
    fn test_level_filtering() {
        let cap = Capture::new(Options {
            level: "warn".to_string(),
            ..Options::default()
        });
        cap.logger.debug("dropped", &[]);
        cap.logger.info("dropped", &[]);
        cap.logger.warn("kept", &[]);

        let records = cap.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], "kept");
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let cap = Capture::new(debug_options());
        let line = line!() + 1;
        cap.logger.info("here", &[]);

        let records = cap.records();
        assert_eq!(records[0]["call"], format!("logger/mod.rs:{line}"));
    }

    #[test]
    fn test_disable_caller() {
        let cap = Capture::new(Options {
            disable_caller: true,
            ..Options::default()
        });
        cap.logger.info("no caller", &[]);
        assert!(cap.records()[0].get("call").is_none());
    }

    #[test]
    fn test_v_levels() {
        let cap = Capture::new(debug_options());
        assert!(cap.logger.v(0).enabled());
        assert!(cap.logger.v(1).enabled());

        cap.logger.atomic_level().set_level(Level::Info);
        assert!(cap.logger.v(0).enabled());
        assert!(!cap.logger.v(1).enabled());

        cap.logger.v(1).info("hidden", &[]);
        cap.logger.v(0).info("shown", &[]);
        let records = cap.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], "shown");
    }

    #[test]
    #[should_panic(expected = "valid log level is [0, 1]")]
    fn test_v_out_of_range_panics() {
        let cap = Capture::new(Options::default());
        let _ = cap.logger.v(2);
    }

    #[test]
    fn test_with_name_is_hierarchical() {
        let cap = Capture::new(Options {
            name: "root".to_string(),
            ..Options::default()
        });
        let child = cap.logger.with_name("a").with_name("b");
        assert_eq!(child.name(), "root.a.b");

        child.info("from child", &[]);
        cap.logger.info("from root", &[]);

        let records = cap.records();
        assert_eq!(records[0]["logger"], "root.a.b");
        assert_eq!(records[1]["logger"], "root");
    }

    #[test]
    fn test_with_values_does_not_touch_receiver() {
        let cap = Capture::new(Options::default());
        let derived = cap.logger.with_values(&kv!["request", "r-1"]);
        derived.info("derived", &[field::bool("ok", true)]);
        cap.logger.info("original", &[]);

        let records = cap.records();
        assert_eq!(records[0]["request"], "r-1");
        assert_eq!(records[0]["ok"], true);
        assert!(records[1].get("request").is_none());
    }

    #[test]
    fn test_write_adapter() {
        let cap = Capture::new(Options::default());
        let mut sink = cap.logger.clone();
        let n = sink.write(b"from a writer\n").unwrap();
        assert_eq!(n, 14);
        io::Write::flush(&mut sink).unwrap();

        let records = cap.records();
        assert_eq!(records[0]["message"], "from a writer");
        assert_eq!(records[0]["level"], "INFO");
    }

    #[test]
    fn test_write_strips_only_one_newline() {
        let cap = Capture::new(Options::default());
        let mut sink = cap.logger.clone();
        sink.write_all(b"first\nsecond\n\n").unwrap();
        sink.write_all(b"no newline").unwrap();

        let records = cap.records();
        assert_eq!(records[0]["message"], "first\nsecond\n");
        assert_eq!(records[1]["message"], "no newline");
    }

    #[test]
    fn test_keyed_misuse_emits_diagnostic_and_keeps_prefix() {
        let cap = Capture::new(debug_options());
        cap.logger.infow("odd", &kv!["a", 1, "b"]);

        let records = cap.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["level"], "DPANIC");
        assert_eq!(records[0]["ignored key"], "b");
        assert_eq!(records[1]["message"], "odd");
        assert_eq!(records[1]["a"], 1);
        assert!(records[1].get("b").is_none());
    }

    #[test]
    #[should_panic(expected = "odd number of arguments")]
    fn test_dpanic_panics_in_development() {
        let cap = Capture::new(Options {
            development: true,
            ..Options::default()
        });
        cap.logger.infow("odd", &kv!["a"]);
    }

    #[test]
    fn test_panic_logs_then_panics() {
        let cap = Capture::new(Options::default());
        let logger = cap.logger.clone();
        let result = std::panic::catch_unwind(AssertUnwindSafe(move || {
            logger.panic("giving up", &[field::string("why", "test")]);
        }));
        assert!(result.is_err());

        let records = cap.records();
        assert_eq!(records[0]["level"], "PANIC");
        assert_eq!(records[0]["why"], "test");
        assert!(records[0]["stacktrace"].is_string());
    }

    #[test]
    fn test_disable_stacktrace() {
        let cap = Capture::new(Options {
            disable_stacktrace: true,
            ..Options::default()
        });
        let logger = cap.logger.clone();
        let _ = std::panic::catch_unwind(AssertUnwindSafe(move || {
            logger.panicf(format_args!("no stack"));
        }));
        assert!(cap.records()[0].get("stacktrace").is_none());
    }

    #[test]
    fn test_sampling_thins_repeats() {
        let cap = Capture::new(Options::default());
        for _ in 0..150 {
            cap.logger.info("same", &[]);
        }
        assert_eq!(cap.records().len(), 100);
    }
}
