//! Logger construction from `Options`.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::sampler::{Sampler, SAMPLING_INITIAL, SAMPLING_THEREAFTER, SAMPLING_TICK};
use crate::backend::sink::MultiSink;
use crate::backend::Backend;
use crate::config::{Format, Options};
use crate::encoder::{ConsoleEncoder, Encoder, EncoderConfig, JsonEncoder, LevelEncoder};
use crate::level::{AtomicLevel, Level};
use crate::logger::Logger;
use crate::redirect;

pub use crate::backend::sink::SinkError;

/// Why a logger could not be built.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown log format: {0:?}")]
    UnknownFormat(String),

    #[error(transparent)]
    OpenSink(#[from] SinkError),
}

pub(super) fn build(opts: &Options) -> Result<Logger, BuildError> {
    let level = opts.level_or_default();
    let format: Format = opts
        .format
        .parse()
        .map_err(|_| BuildError::UnknownFormat(opts.format.clone()))?;

    let encode_level = if format == Format::Console && opts.enable_color {
        LevelEncoder::CapitalColor
    } else {
        LevelEncoder::Capital
    };
    let config = EncoderConfig::standard(encode_level);
    let encoder: Box<dyn Encoder> = match format {
        Format::Console => Box::new(ConsoleEncoder::new(config)),
        Format::Json => Box::new(JsonEncoder::new(config)),
    };

    let backend = Backend {
        level: AtomicLevel::new(level),
        encoder,
        sampler: Some(Sampler::new(
            SAMPLING_TICK,
            SAMPLING_INITIAL,
            SAMPLING_THEREAFTER,
        )),
        out: MultiSink::open(&opts.output_paths)?,
        err_out: MultiSink::open(&opts.error_output_paths)?,
        add_caller: !opts.disable_caller,
        stack_level: if opts.disable_stacktrace {
            None
        } else {
            Some(Level::Panic)
        },
        development: opts.development,
    };

    let logger = Logger::from_backend(Arc::new(backend), &opts.name);
    redirect::redirect_std_log(&logger);
    Ok(logger)
}
