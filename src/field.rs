//! Structured fields.
//!
//! A [`Field`] is one key and a typed value. The set of value kinds is closed:
//! every constructor below tags its value with the matching [`FieldValue`]
//! variant, and the encoders render each variant their own way.

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Well-known key for request identifiers.
pub const KEY_REQUEST_ID: &str = "requestID";

/// Well-known key for user names.
pub const KEY_USER_NAME: &str = "username";

/// Default key used by [`err`].
pub const KEY_ERROR: &str = "error";

/// Typed value carried by a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Duration(Duration),
    Time(DateTime<Local>),
    Binary(Vec<u8>),
    /// Nested objects and anything else serde can describe.
    Json(serde_json::Value),
    Error(String),
    /// A list of typed values; each element goes through the same encoders
    /// as a standalone field.
    Array(Vec<FieldValue>),
}

/// A key paired with a typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }
        )*
    };
}

impl_from_for_value! {
    &str => |v| FieldValue::String(v.to_string()),
    String => |v| FieldValue::String(v),
    bool => |v| FieldValue::Bool(v),
    i8 => |v| FieldValue::Int(i64::from(v)),
    i16 => |v| FieldValue::Int(i64::from(v)),
    i32 => |v| FieldValue::Int(i64::from(v)),
    i64 => |v| FieldValue::Int(v),
    isize => |v| FieldValue::Int(v as i64),
    u8 => |v| FieldValue::Uint(u64::from(v)),
    u16 => |v| FieldValue::Uint(u64::from(v)),
    u32 => |v| FieldValue::Uint(u64::from(v)),
    u64 => |v| FieldValue::Uint(v),
    usize => |v| FieldValue::Uint(v as u64),
    f32 => |v| FieldValue::Float(widen_f32(v)),
    f64 => |v| FieldValue::Float(v),
    Duration => |v| FieldValue::Duration(v),
    DateTime<Local> => |v| FieldValue::Time(v),
    DateTime<Utc> => |v| FieldValue::Time(v.with_timezone(&Local)),
    Vec<u8> => |v| FieldValue::Binary(v),
    serde_json::Value => |v| FieldValue::Json(v),
}

// Go through the shortest decimal form so 0.1f32 stays 0.1 once widened.
fn widen_f32(v: f32) -> f64 {
    if v.is_finite() {
        v.to_string().parse().unwrap_or(f64::from(v))
    } else {
        f64::from(v)
    }
}

pub fn string(key: &str, value: impl Into<String>) -> Field {
    Field::new(key, FieldValue::String(value.into()))
}

pub fn strings<S: AsRef<str>>(key: &str, values: &[S]) -> Field {
    let items = values
        .iter()
        .map(|s| FieldValue::String(s.as_ref().to_string()))
        .collect();
    Field::new(key, FieldValue::Array(items))
}

/// A value rendered through its `Display` impl.
pub fn stringer(key: &str, value: &dyn fmt::Display) -> Field {
    Field::new(key, FieldValue::String(value.to_string()))
}

/// The current call stack, captured now.
pub fn stack(key: &str) -> Field {
    Field::new(
        key,
        FieldValue::String(Backtrace::force_capture().to_string()),
    )
}

pub fn bool(key: &str, value: bool) -> Field {
    Field::new(key, FieldValue::Bool(value))
}

pub fn int(key: &str, value: impl Into<i64>) -> Field {
    Field::new(key, FieldValue::Int(value.into()))
}

pub fn int8(key: &str, value: i8) -> Field {
    int(key, value)
}

pub fn int16(key: &str, value: i16) -> Field {
    int(key, value)
}

pub fn int32(key: &str, value: i32) -> Field {
    int(key, value)
}

pub fn int64(key: &str, value: i64) -> Field {
    int(key, value)
}

pub fn uint(key: &str, value: impl Into<u64>) -> Field {
    Field::new(key, FieldValue::Uint(value.into()))
}

pub fn uint8(key: &str, value: u8) -> Field {
    uint(key, value)
}

pub fn uint16(key: &str, value: u16) -> Field {
    uint(key, value)
}

pub fn uint32(key: &str, value: u32) -> Field {
    uint(key, value)
}

pub fn uint64(key: &str, value: u64) -> Field {
    uint(key, value)
}

pub fn float32(key: &str, value: f32) -> Field {
    Field::new(key, FieldValue::Float(widen_f32(value)))
}

pub fn float64(key: &str, value: f64) -> Field {
    Field::new(key, FieldValue::Float(value))
}

pub fn duration(key: &str, value: Duration) -> Field {
    Field::new(key, FieldValue::Duration(value))
}

pub fn time(key: &str, value: DateTime<Local>) -> Field {
    Field::new(key, FieldValue::Time(value))
}

/// Opaque bytes, rendered as base64.
pub fn binary(key: &str, value: impl Into<Vec<u8>>) -> Field {
    Field::new(key, FieldValue::Binary(value.into()))
}

/// UTF-8 bytes, rendered as text. Invalid sequences are replaced.
pub fn byte_string(key: &str, value: &[u8]) -> Field {
    Field::new(
        key,
        FieldValue::String(String::from_utf8_lossy(value).into_owned()),
    )
}

/// An error under the conventional `error` key.
pub fn err(error: &dyn StdError) -> Field {
    named_err(KEY_ERROR, error)
}

pub fn named_err(key: &str, error: &dyn StdError) -> Field {
    Field::new(key, FieldValue::Error(error.to_string()))
}

/// A nested object built from any serializable value.
///
/// Serialization failures are recorded under `<key>Error` rather than lost.
pub fn object<T: Serialize + ?Sized>(key: &str, value: &T) -> Field {
    match serde_json::to_value(value) {
        Ok(json) => Field::new(key, FieldValue::Json(json)),
        Err(e) => Field::new(format!("{key}Error"), FieldValue::Error(e.to_string())),
    }
}

/// A list of values of one kind, e.g. `array("ids", &[1u64, 2, 3])`.
pub fn array<T: Clone + Into<FieldValue>>(key: &str, values: &[T]) -> Field {
    Field::new(
        key,
        FieldValue::Array(values.iter().cloned().map(Into::into).collect()),
    )
}

pub fn durations(key: &str, values: &[Duration]) -> Field {
    array(key, values)
}

pub fn times(key: &str, values: &[DateTime<Local>]) -> Field {
    array(key, values)
}

pub fn errors(key: &str, values: &[&dyn StdError]) -> Field {
    let items = values
        .iter()
        .map(|e| FieldValue::Error(e.to_string()))
        .collect();
    Field::new(key, FieldValue::Array(items))
}

/// A field whose kind is chosen by the value's type.
pub fn any(key: &str, value: impl Into<FieldValue>) -> Field {
    Field::new(key, value.into())
}
