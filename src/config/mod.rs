//! Logger configuration.
//!
//! # Data Flow
//! ```text
//! Options::default()
//!     → flags.rs (clap, `log.` prefixed)   or   loader.rs (TOML file)
//!     → validation.rs (collects every violation)
//!     → Logger::new(&options)
//! ```
//!
//! # Design Decisions
//! - Options are plain data; every field has a default so minimal configs work
//! - Level and format stay strings until build time, so validation can report
//!   exactly what the user wrote

pub mod flags;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_options, parse_options, ConfigError};
pub use schema::{Format, Options, ParseFormatError, CONSOLE_FORMAT, JSON_FORMAT};
pub use validation::{ValidationError, ValidationErrors};
