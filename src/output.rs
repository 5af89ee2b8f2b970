//! # Output Styling
//!
//! Helpers for the CLI's human-readable output. Color and emoji are used
//! only when the user and the terminal both allow it:
//!
//! - `--color=always|never|auto` on the command line
//! - `NO_COLOR` (any value) disables color (https://no-color.org/)
//! - `CLICOLOR=0` disables color, `CLICOLOR_FORCE=1` forces it
//! - `TERM=dumb` disables color
//! - otherwise the `console` crate decides from the attached terminal

use std::env;

use console::style;

/// Whether styled output is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve from the `--color` flag value and the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0") {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// The emoji when styled output is on, the plain marker otherwise.
    pub fn marker<'a>(&self, emoji: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            emoji
        } else {
            plain
        }
    }

    /// Abbreviated commit id, highlighted when styled output is on.
    pub fn commit(&self, id: &str) -> String {
        let short: String = id.chars().take(12).collect();
        if self.use_color {
            style(short).yellow().to_string()
        } else {
            short
        }
    }

    /// A record or package name, emphasized when styled output is on.
    pub fn name(&self, name: &str) -> String {
        if self.use_color {
            style(name).bold().to_string()
        } else {
            name.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
