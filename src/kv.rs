//! Loose key/value arguments.
//!
//! Keyed logging calls (`infow`, `with_values`, ...) take a flat list that
//! alternates keys and values. [`Kv`] is one element of that list and the
//! [`kv!`](crate::kv!) macro builds a list from ordinary expressions.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};

use crate::field::{self, Field, FieldValue};
use crate::level::Level;
use crate::logger::Logger;

/// One element of a flat key/value list.
#[derive(Debug, Clone, PartialEq)]
pub enum Kv {
    /// A key or a value.
    Value(FieldValue),
    /// A pre-built field. Not valid in a key/value list.
    Field(Field),
}

macro_rules! impl_from_for_kv {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Kv {
                fn from(v: $ty) -> Self {
                    Kv::Value(FieldValue::from(v))
                }
            }
        )*
    };
}

impl_from_for_kv!(
    &str,
    String,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    Duration,
    DateTime<Local>,
    DateTime<Utc>,
    Vec<u8>,
    serde_json::Value,
);

impl From<&String> for Kv {
    fn from(v: &String) -> Self {
        Kv::Value(FieldValue::String(v.clone()))
    }
}

impl From<FieldValue> for Kv {
    fn from(v: FieldValue) -> Self {
        Kv::Value(v)
    }
}

impl From<Field> for Kv {
    fn from(f: Field) -> Self {
        Kv::Field(f)
    }
}

/// Build a `Vec<Kv>` from alternating keys and values.
///
/// ```
/// use leveled_log::kv;
///
/// let args = kv!["user", "alice", "attempts", 3];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        ::std::vec::Vec::<$crate::kv::Kv>::new()
    };
    ($($item:expr),+ $(,)?) => {
        vec![$($crate::kv::Kv::from($item)),+]
    };
}

/// Turn a flat key/value list into fields.
///
/// Walks the list two elements at a time and stops at the first malformed
/// pair; everything collected before that point is kept. Each stop emits a
/// diagnostic record through `logger`.
#[track_caller]
pub(crate) fn coerce(logger: &Logger, args: &[Kv]) -> Vec<Field> {
    let mut fields = Vec::with_capacity(args.len() / 2);
    let mut i = 0;
    while i < args.len() {
        let key = match &args[i] {
            Kv::Field(f) => {
                logger.diagnostic(
                    Level::Debug,
                    "strongly-typed field passed as a key/value argument",
                    vec![field::string("field", f.key.clone())],
                );
                break;
            }
            Kv::Value(_) if i == args.len() - 1 => {
                logger.diagnostic(
                    Level::DPanic,
                    "odd number of arguments passed as key-value pairs for logging",
                    vec![describe("ignored key", &args[i])],
                );
                break;
            }
            Kv::Value(FieldValue::String(key)) => key,
            Kv::Value(_) => {
                logger.diagnostic(
                    Level::DPanic,
                    "non-string key argument passed to logging, ignoring all later arguments",
                    vec![describe("invalid key", &args[i])],
                );
                break;
            }
        };

        let value = match &args[i + 1] {
            Kv::Value(v) => v.clone(),
            Kv::Field(f) => FieldValue::String(format!("{f:?}")),
        };
        fields.push(Field::new(key.clone(), value));
        i += 2;
    }
    fields
}

fn describe(key: &str, arg: &Kv) -> Field {
    match arg {
        Kv::Value(v) => Field::new(key, v.clone()),
        Kv::Field(f) => field::string(key, format!("{f:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn quiet_logger() -> (tempfile::TempDir, Logger) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.log");
        let opts = Options {
            format: "json".to_string(),
            output_paths: vec![path.to_string_lossy().into_owned()],
            ..Options::default()
        };
        (dir, Logger::new(&opts))
    }

    #[test]
    fn test_pairs_become_fields() {
        let (_dir, logger) = quiet_logger();
        let fields = coerce(&logger, &kv!["a", 1, "b", 2]);
        assert_eq!(fields, vec![field::any("a", 1), field::any("b", 2)]);
    }

    #[test]
    fn test_odd_count_drops_trailing_key() {
        let (_dir, logger) = quiet_logger();
        let fields = coerce(&logger, &kv!["a", 1, "b"]);
        assert_eq!(fields, vec![field::any("a", 1)]);
    }

    #[test]
    fn test_non_string_key_drops_everything_after() {
        let (_dir, logger) = quiet_logger();
        assert!(coerce(&logger, &kv![1, "a", "b", 2]).is_empty());

        let fields = coerce(&logger, &kv!["a", 1, 2, "b"]);
        assert_eq!(fields, vec![field::any("a", 1)]);
    }

    #[test]
    fn test_prebuilt_field_stops_processing() {
        let (_dir, logger) = quiet_logger();
        let fields = coerce(&logger, &kv!["a", 1, field::int("x", 1), "b", 2]);
        assert_eq!(fields, vec![field::any("a", 1)]);
    }

    #[test]
    fn test_empty_list() {
        let (_dir, logger) = quiet_logger();
        assert!(coerce(&logger, &kv![]).is_empty());
    }
}
