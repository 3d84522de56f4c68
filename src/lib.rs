//! Leveled, structured logging.
//!
//! ```text
//! Options ──(flags | TOML)──▶ validate ──▶ Logger::new
//!                                            │
//!   info / infof / infow ◀───────────────────┤
//!   v(0|1) → InfoLogger                      │
//!   with / with_values / with_name           │
//!                                            ▼
//!                         Backend: level → sampler → encoder → sinks
//!                                            ▲
//!   log::* / tracing::* ──── redirect ───────┘
//! ```

mod backend;
pub mod config;
pub mod context;
pub mod encoder;
pub mod field;
pub mod global;
pub mod kv;
pub mod level;
pub mod logger;
pub mod redirect;

pub use config::{Format, Options, ValidationError, ValidationErrors};
pub use context::Context;
pub use field::{Field, FieldValue, KEY_ERROR, KEY_REQUEST_ID, KEY_USER_NAME};
pub use kv::Kv;
pub use level::{AtomicLevel, Level, ParseLevelError};
pub use logger::{BuildError, InfoLogger, Logger, SinkError, DISABLED};
