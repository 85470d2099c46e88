//! Step keyword and logical keyword name types.
//!
//! [`StepKeyword`] is the keyword a classified step line starts with, while
//! [`KeywordName`] enumerates the nine logical names a keyword table maps to
//! literal, language-specific strings.

use std::fmt;
use std::str::FromStr;

/// Keyword a step line was introduced with.
///
/// The enum includes `And` and `But` variants because line classification
/// reports what was written; the parser resolves them against the preceding
/// `Given`/`When`/`Then` using [`resolve`](Self::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Setup preconditions for a scenario.
    Given,
    /// Perform an action when testing behaviour.
    When,
    /// Assert the expected outcome of a scenario.
    Then,
    /// Additional clause sharing the kind of the previous step.
    And,
    /// Contrasting clause sharing the kind of the previous step.
    But,
}

impl StepKeyword {
    /// Return the keyword as a string slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use corejet_patterns::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Given.as_str(), "Given");
    /// assert_eq!(StepKeyword::But.as_str(), "But");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Whether the keyword continues the previous step rather than starting
    /// a new kind.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        matches!(self, Self::And | Self::But)
    }

    /// Resolve conjunctions to the primary keyword of the previous step.
    ///
    /// Primary keywords update `prev` and are returned unchanged. `And` and
    /// `But` return the keyword stored in `prev`, or `None` when no primary
    /// step has been seen yet.
    ///
    /// # Examples
    ///
    /// ```
    /// use corejet_patterns::StepKeyword;
    ///
    /// let mut prev = None;
    /// assert_eq!(StepKeyword::And.resolve(&mut prev), None);
    /// assert_eq!(StepKeyword::When.resolve(&mut prev), Some(StepKeyword::When));
    /// assert_eq!(StepKeyword::But.resolve(&mut prev), Some(StepKeyword::When));
    /// ```
    #[must_use]
    pub fn resolve(self, prev: &mut Option<Self>) -> Option<Self> {
        if self.is_continuation() {
            *prev
        } else {
            *prev = Some(self);
            Some(self)
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical keyword names understood by every keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordName {
    /// Opens a concrete scenario.
    Scenario,
    /// Opens a templated scenario expanded from an examples table.
    ScenarioOutline,
    /// Introduces the examples table of an outline.
    Examples,
    /// Opens the story background.
    Background,
    /// Primary `Given` step.
    Given,
    /// Primary `When` step.
    When,
    /// Primary `Then` step.
    Then,
    /// `And` continuation.
    And,
    /// `But` continuation.
    But,
}

impl KeywordName {
    /// Every logical name, in table order.
    pub const ALL: [Self; 9] = [
        Self::Scenario,
        Self::ScenarioOutline,
        Self::Examples,
        Self::Background,
        Self::Given,
        Self::When,
        Self::Then,
        Self::And,
        Self::But,
    ];

    /// The English spelling of the logical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scenario => "Scenario",
            Self::ScenarioOutline => "Scenario Outline",
            Self::Examples => "Examples",
            Self::Background => "Background",
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// The logical name used to look up a step keyword.
    #[must_use]
    pub const fn for_step(keyword: StepKeyword) -> Self {
        match keyword {
            StepKeyword::Given => Self::Given,
            StepKeyword::When => Self::When,
            StepKeyword::Then => Self::Then,
            StepKeyword::And => Self::And,
            StepKeyword::But => Self::But,
        }
    }
}

impl fmt::Display for KeywordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`KeywordName`] from a string fails.
///
/// Contains the unrecognised name for diagnostic purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordNameParseError(pub String);

impl fmt::Display for KeywordNameParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid keyword name: {}", self.0)
    }
}

impl std::error::Error for KeywordNameParseError {}

impl FromStr for KeywordName {
    type Err = KeywordNameParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| KeywordNameParseError(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[expect(clippy::expect_used, reason = "test helper with descriptive failures")]
    fn parse_name(input: &str) -> KeywordName {
        input
            .parse()
            .expect("test input should parse to a keyword name")
    }

    #[rstest]
    #[case("Scenario", KeywordName::Scenario)]
    #[case("scenario outline", KeywordName::ScenarioOutline)]
    #[case(" EXAMPLES ", KeywordName::Examples)]
    #[case("background", KeywordName::Background)]
    #[case("but", KeywordName::But)]
    fn parses_names_case_insensitively(#[case] input: &str, #[case] expected: KeywordName) {
        assert_eq!(parse_name(input), expected);
    }

    #[test]
    fn rejects_unknown_name() {
        let Err(err) = "Feature".parse::<KeywordName>() else {
            panic!("expected parse error for unknown keyword name");
        };
        assert_eq!(err.0, "Feature");
        assert_eq!(err.to_string(), "invalid keyword name: Feature");
    }

    #[test]
    fn resolve_returns_previous_for_conjunctions() {
        let mut prev = Some(StepKeyword::When);
        assert_eq!(StepKeyword::And.resolve(&mut prev), Some(StepKeyword::When));
        assert_eq!(StepKeyword::But.resolve(&mut prev), Some(StepKeyword::When));
        assert_eq!(prev, Some(StepKeyword::When));
    }

    #[test]
    fn resolve_updates_previous_for_primary_keywords() {
        let mut prev = Some(StepKeyword::Given);
        assert_eq!(StepKeyword::Then.resolve(&mut prev), Some(StepKeyword::Then));
        assert_eq!(prev, Some(StepKeyword::Then));
    }

    #[test]
    fn resolve_reports_missing_predecessor() {
        let mut prev = None;
        assert_eq!(StepKeyword::But.resolve(&mut prev), None);
        assert_eq!(prev, None);
    }

    #[rstest]
    #[case(StepKeyword::Given, KeywordName::Given)]
    #[case(StepKeyword::And, KeywordName::And)]
    #[case(StepKeyword::But, KeywordName::But)]
    fn maps_step_keywords_to_names(#[case] keyword: StepKeyword, #[case] expected: KeywordName) {
        assert_eq!(KeywordName::for_step(keyword), expected);
    }
}
