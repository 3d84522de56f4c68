//! Command-line flags for logger options.
//!
//! Every option is exposed under the `log.` prefix. Defaults are taken from
//! the `Options` value the flags are added from, so `--help` shows the values
//! that will be used if a flag is not given.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::config::schema::Options;

pub const FLAG_LEVEL: &str = "log.level";
pub const FLAG_DISABLE_CALLER: &str = "log.disable-caller";
pub const FLAG_DISABLE_STACKTRACE: &str = "log.disable-stacktrace";
pub const FLAG_FORMAT: &str = "log.format";
pub const FLAG_ENABLE_COLOR: &str = "log.enable-color";
pub const FLAG_OUTPUT_PATHS: &str = "log.output-paths";
pub const FLAG_ERROR_OUTPUT_PATHS: &str = "log.error-output-paths";
pub const FLAG_DEVELOPMENT: &str = "log.development";
pub const FLAG_NAME: &str = "log.name";

fn string_flag(id: &'static str, default: &str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name(value_name)
        .default_value(default.to_string())
        .help(help)
}

fn list_flag(id: &'static str, defaults: &[String], help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name("PATHS")
        .value_delimiter(',')
        .action(ArgAction::Set)
        .default_values(defaults.to_vec())
        .help(help)
}

/// `--flag`, `--flag=true` and `--flag=false` are all accepted.
fn bool_flag(id: &'static str, default: bool, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .default_value(if default { "true" } else { "false" })
        .value_parser(value_parser!(bool))
        .action(ArgAction::Set)
        .help(help)
}

impl Options {
    /// Register every option as a flag on `cmd`.
    ///
    /// Performs no validation; call [`Options::validate`] after
    /// [`Options::apply_flags`].
    pub fn add_flags(&self, cmd: Command) -> Command {
        cmd.arg(string_flag(
            FLAG_LEVEL,
            &self.level,
            "LEVEL",
            "Minimum log output LEVEL.",
        ))
        .arg(bool_flag(
            FLAG_DISABLE_CALLER,
            self.disable_caller,
            "Disable output of caller information in the log.",
        ))
        .arg(bool_flag(
            FLAG_DISABLE_STACKTRACE,
            self.disable_stacktrace,
            "Disable the stack trace recorded for messages at or above panic level.",
        ))
        .arg(string_flag(
            FLAG_FORMAT,
            &self.format,
            "FORMAT",
            "Log output FORMAT, console or json.",
        ))
        .arg(bool_flag(
            FLAG_ENABLE_COLOR,
            self.enable_color,
            "Enable ANSI colors in console format logs.",
        ))
        .arg(list_flag(
            FLAG_OUTPUT_PATHS,
            &self.output_paths,
            "Output paths of log.",
        ))
        .arg(list_flag(
            FLAG_ERROR_OUTPUT_PATHS,
            &self.error_output_paths,
            "Error output paths of log.",
        ))
        .arg(bool_flag(
            FLAG_DEVELOPMENT,
            self.development,
            "Development mode: dpanic records panic after being written.",
        ))
        .arg(string_flag(
            FLAG_NAME,
            &self.name,
            "NAME",
            "The name of the logger.",
        ))
    }

    /// Copy parsed flag values back into the options.
    pub fn apply_flags(&mut self, matches: &ArgMatches) {
        if let Some(v) = matches.get_one::<String>(FLAG_LEVEL) {
            self.level = v.clone();
        }
        if let Some(v) = matches.get_one::<String>(FLAG_FORMAT) {
            self.format = v.clone();
        }
        if let Some(v) = matches.get_one::<String>(FLAG_NAME) {
            self.name = v.clone();
        }
        if let Some(v) = matches.get_many::<String>(FLAG_OUTPUT_PATHS) {
            self.output_paths = v.cloned().collect();
        }
        if let Some(v) = matches.get_many::<String>(FLAG_ERROR_OUTPUT_PATHS) {
            self.error_output_paths = v.cloned().collect();
        }
        if let Some(v) = matches.get_one::<bool>(FLAG_DISABLE_CALLER) {
            self.disable_caller = *v;
        }
        if let Some(v) = matches.get_one::<bool>(FLAG_DISABLE_STACKTRACE) {
            self.disable_stacktrace = *v;
        }
        if let Some(v) = matches.get_one::<bool>(FLAG_ENABLE_COLOR) {
            self.enable_color = *v;
        }
        if let Some(v) = matches.get_one::<bool>(FLAG_DEVELOPMENT) {
            self.development = *v;
        }
    }
}
