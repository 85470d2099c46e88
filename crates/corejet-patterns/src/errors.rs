//! Error types shared by the keyword and classification modules.

use thiserror::Error;

/// Errors surfaced while compiling the per-language line matchers.
///
/// # Examples
/// ```
/// use corejet_patterns::PatternError;
/// let err = PatternError::Matcher {
///     language: "fi".into(),
///     source: regex::Error::Syntax("bad".into()),
/// };
/// assert!(err.to_string().starts_with("failed to compile matcher for language `fi`"));
/// ```
#[derive(Debug, Error)]
pub enum PatternError {
    /// A keyword could not be turned into a valid regular expression.
    #[error("failed to compile matcher for language `{language}`: {source}")]
    Matcher {
        /// Language whose keywords were being compiled.
        language: String,
        /// Underlying regex failure.
        #[source]
        source: regex::Error,
    },
    /// A matcher that does not depend on keywords failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn matcher_error(language: &str, source: regex::Error) -> PatternError {
    PatternError::Matcher {
        language: language.to_string(),
        source,
    }
}
