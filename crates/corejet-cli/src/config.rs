//! Tool configuration parsed from environment variables.
//!
//! Every setting can be overridden on the command line.
//!
//! - `COREJET_LOG_LEVEL`: trace, debug, info, warn or error (default `warn`)
//! - `COREJET_LANGUAGE`: default language of acceptance criteria (default
//!   `en`)

use std::env;
use std::fmt;
use std::str::FromStr;

use corejet::{DEFAULT_LANGUAGE, KeywordTable};

use crate::error::CliError;

/// Environment variable holding the log level.
pub const LOG_LEVEL_VAR: &str = "COREJET_LOG_LEVEL";
/// Environment variable holding the default criteria language.
pub const LANGUAGE_VAR: &str = "COREJET_LANGUAGE";

/// Log level enumeration matching tracing crate levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging.
    Trace,
    /// Skipped lines and unknown report elements.
    Debug,
    /// Progress messages.
    Info,
    /// Ignored report values and other recoverable problems.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// A criteria language with built-in keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language(String);

impl Language {
    /// Lowercase language code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let table = KeywordTable::builtin();
        let code = s.trim().to_ascii_lowercase();
        if table.supports(&code) {
            return Ok(Self(code));
        }
        let known: Vec<_> = table.languages().map(|(code, _)| code).collect();
        Err(CliError::InvalidConfig(format!(
            "unsupported language '{s}', expected one of: {}",
            known.join(", ")
        )))
    }
}

/// Configuration for the command line tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level.
    pub log_level: LogLevel,
    /// Language assumed for criteria without a `# language:` directive.
    pub language: Language,
}

impl CliConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let log_level = lookup(LOG_LEVEL_VAR)
            .map(|value| value.parse::<LogLevel>())
            .transpose()?
            .unwrap_or_default();
        let language = lookup(LANGUAGE_VAR)
            .map(|value| value.parse::<Language>())
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            log_level,
            language,
        })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>, language: Option<Language>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(language) = language {
            self.language = language;
        }
        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("Debug", LogLevel::Debug)]
    #[case("INFO", LogLevel::Info)]
    #[case("warn", LogLevel::Warn)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    fn log_level_parses_valid_values(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>().ok(), Some(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let Err(error) = "loud".parse::<LogLevel>() else {
            panic!("expected an invalid log level");
        };
        assert!(error.to_string().contains("unknown log level"));
    }

    #[rstest]
    #[case("en", "en")]
    #[case(" FI ", "fi")]
    fn language_accepts_builtin_codes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(input.parse::<Language>().ok().as_ref().map(Language::as_str), Some(expected));
    }

    #[test]
    fn language_rejects_unknown_codes() {
        let Err(error) = "xx".parse::<Language>() else {
            panic!("expected an unsupported language");
        };
        assert_eq!(
            error.to_string(),
            "invalid configuration: unsupported language 'xx', expected one of: en, fi"
        );
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = CliConfig::from_lookup(lookup(&[])).ok();
        assert_eq!(config, Some(CliConfig::default()));
        assert_eq!(CliConfig::default().log_level, LogLevel::Warn);
        assert_eq!(CliConfig::default().language.as_str(), "en");
    }

    #[test]
    fn reads_variables() {
        let config =
            CliConfig::from_lookup(lookup(&[(LOG_LEVEL_VAR, "debug"), (LANGUAGE_VAR, "fi")])).ok();
        assert_eq!(config.as_ref().map(|c| c.log_level), Some(LogLevel::Debug));
        assert_eq!(
            config.as_ref().map(|c| c.language.as_str()),
            Some("fi")
        );
    }

    #[test]
    fn invalid_variables_are_errors() {
        assert!(CliConfig::from_lookup(lookup(&[(LOG_LEVEL_VAR, "verbose")])).is_err());
        assert!(CliConfig::from_lookup(lookup(&[(LANGUAGE_VAR, "klingon")])).is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let config = CliConfig::default()
            .apply_overrides(Some(LogLevel::Error), "fi".parse().ok());
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.language.as_str(), "fi");

        let config = CliConfig::default().apply_overrides(None, None);
        assert_eq!(config, CliConfig::default());
    }
}
