//! Options loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Options;
use crate::config::validation::ValidationErrors;

/// Error type for options loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Parse and validate options from TOML text.
///
/// Keys match the flag names without the `log.` prefix; missing keys keep
/// their defaults.
pub fn parse_options(content: &str) -> Result<Options, ConfigError> {
    let options: Options = toml::from_str(content)?;
    options.validate()?;
    Ok(options)
}

/// Load and validate options from a TOML file.
pub fn load_options(path: &Path) -> Result<Options, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_options(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let opts = parse_options(
            r#"
            level = "debug"
            format = "json"
            output-paths = ["stdout", "app.log"]
            disable-caller = true
            "#,
        )
        .unwrap();

        assert_eq!(opts.level, "debug");
        assert_eq!(opts.format, "json");
        assert_eq!(opts.output_paths, vec!["stdout", "app.log"]);
        assert!(opts.disable_caller);
        assert_eq!(opts.error_output_paths, vec!["stderr"]);
    }

    #[test]
    fn test_invalid_values_report_every_error() {
        let err = parse_options("level = \"loud\"\nformat = \"xml\"\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(parse_options("level = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.toml");
        fs::write(&path, "name = \"api\"\n").unwrap();

        let opts = load_options(&path).unwrap();
        assert_eq!(opts.name, "api");

        let missing = load_options(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
