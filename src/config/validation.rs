//! Options validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: &Options → Result<(), ValidationErrors>
//! - Construction does not require it; an unparseable level falls back to
//!   `info` at build time

use thiserror::Error;

use crate::config::schema::{Format, Options};
use crate::level::Level;

/// A single problem with an `Options` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unrecognized level: {0:?}")]
    Level(String),

    #[error("not a valid log format: {0:?}")]
    Format(String),
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn render(errors: &[ValidationError]) -> String {
    let mut out = if errors.len() == 1 {
        "1 error occurred:".to_string()
    } else {
        format!("{} errors occurred:", errors.len())
    };
    for err in errors {
        out.push_str("\n\t* ");
        out.push_str(&err.to_string());
    }
    out
}

impl Options {
    /// Check the level and format, collecting every violation.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.level.parse::<Level>().is_err() {
            errors.push(ValidationError::Level(self.level.clone()));
        }
        if self.format.parse::<Format>().is_err() {
            errors.push(ValidationError::Format(self.format.clone()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}
