use std::fmt;

use crate::field::Field;
use crate::kv::Kv;
use crate::level::Level;
use crate::logger::Logger;

/// A logger fixed at one verbosity, returned by [`Logger::v`].
///
/// Either live, forwarding every call at its level, or disabled, in which case
/// every call is a no-op.
#[derive(Debug, Clone)]
pub struct InfoLogger {
    inner: Option<(Level, Logger)>,
}

/// The shared disabled view.
pub static DISABLED: InfoLogger = InfoLogger { inner: None };

impl InfoLogger {
    pub(crate) fn live(level: Level, logger: Logger) -> Self {
        Self {
            inner: Some((level, logger)),
        }
    }

    pub fn disabled() -> Self {
        DISABLED.clone()
    }

    /// Whether calls on this view produce records.
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        if let Some((level, logger)) = &self.inner {
            logger.log(*level, msg, fields);
        }
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        if let Some((level, logger)) = &self.inner {
            logger.logf(*level, args);
        }
    }

    #[track_caller]
    pub fn infow(&self, msg: &str, kv: &[Kv]) {
        if let Some((level, logger)) = &self.inner {
            logger.logw(*level, msg, kv);
        }
    }
}

impl Default for InfoLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
