//! The process-wide default logger.
//!
//! Nothing is installed implicitly: [`get`] builds a logger from
//! `Options::default()` only if neither [`init`] nor [`replace`] ran first.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use crate::config::Options;
use crate::logger::Logger;

static GLOBAL: OnceLock<ArcSwap<Logger>> = OnceLock::new();

/// Install `logger` as the default if none is set yet.
///
/// Returns `false` when a default already existed; it is left unchanged.
pub fn init(logger: Logger) -> bool {
    let mut installed = false;
    GLOBAL.get_or_init(|| {
        installed = true;
        ArcSwap::from_pointee(logger)
    });
    installed
}

/// Install `logger` as the default, returning the previous one if any.
pub fn replace(logger: Logger) -> Option<Logger> {
    if let Some(slot) = GLOBAL.get() {
        let previous = slot.swap(Arc::new(logger));
        return Some((*previous).clone());
    }
    if init(logger.clone()) {
        None
    } else {
        // Lost a race with another initializer.
        replace(logger)
    }
}

/// The current default logger.
pub fn get() -> Logger {
    let slot = GLOBAL.get_or_init(|| ArcSwap::from_pointee(default_logger()));
    (**slot.load()).clone()
}

fn default_logger() -> Logger {
    Logger::new(&Options::default())
}
