//! Per-language keyword tables.
//!
//! A [`KeywordTable`] maps a short language code to the literal keywords of
//! that language. Lookups for unknown languages fall back to the table's
//! default language, so callers never have to handle a missing language.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::keyword::KeywordName;

/// Literal keywords of a single language.
///
/// Every logical name has exactly one literal, so a table built from these
/// values can always resolve all nine names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageKeywords {
    /// Literal for [`KeywordName::Scenario`].
    pub scenario: &'static str,
    /// Literal for [`KeywordName::ScenarioOutline`].
    pub scenario_outline: &'static str,
    /// Literal for [`KeywordName::Examples`].
    pub examples: &'static str,
    /// Literal for [`KeywordName::Background`].
    pub background: &'static str,
    /// Literal for [`KeywordName::Given`].
    pub given: &'static str,
    /// Literal for [`KeywordName::When`].
    pub when: &'static str,
    /// Literal for [`KeywordName::Then`].
    pub then: &'static str,
    /// Literal for [`KeywordName::And`].
    pub and: &'static str,
    /// Literal for [`KeywordName::But`].
    pub but: &'static str,
    /// Characters stripped from the end of step text.
    ///
    /// Languages that write a scenario as one punctuated sentence use this to
    /// drop the clause separators.
    pub trailing_punctuation: &'static [char],
}

impl LanguageKeywords {
    /// English keywords.
    pub const ENGLISH: Self = Self {
        scenario: "Scenario",
        scenario_outline: "Scenario Outline",
        examples: "Examples",
        background: "Background",
        given: "Given",
        when: "When",
        then: "Then",
        and: "And",
        but: "But",
        trailing_punctuation: &[],
    };

    /// Finnish keywords.
    pub const FINNISH: Self = Self {
        scenario: "Tapaus",
        scenario_outline: "Tapausaihio",
        examples: "Tapaukset",
        background: "Tausta",
        given: "Oletetaan, että",
        when: "Kun",
        then: "niin",
        and: "ja",
        but: "mutta",
        trailing_punctuation: &[',', '.'],
    };

    /// Look up the literal for a logical keyword name.
    #[must_use]
    pub const fn get(&self, name: KeywordName) -> &'static str {
        match name {
            KeywordName::Scenario => self.scenario,
            KeywordName::ScenarioOutline => self.scenario_outline,
            KeywordName::Examples => self.examples,
            KeywordName::Background => self.background,
            KeywordName::Given => self.given,
            KeywordName::When => self.when,
            KeywordName::Then => self.then,
            KeywordName::And => self.and,
            KeywordName::But => self.but,
        }
    }
}

/// Language code used when nothing else is requested.
pub const DEFAULT_LANGUAGE: &str = "en";

static BUILTIN: LazyLock<KeywordTable> = LazyLock::new(|| {
    KeywordTable::new(DEFAULT_LANGUAGE, LanguageKeywords::ENGLISH)
        .with_language("fi", LanguageKeywords::FINNISH)
});

/// Immutable mapping from language code to [`LanguageKeywords`].
///
/// # Examples
/// ```
/// use corejet_patterns::{KeywordName, KeywordTable};
///
/// let table = KeywordTable::builtin();
/// assert_eq!(table.resolve("fi", KeywordName::Scenario), "Tapaus");
/// assert_eq!(table.resolve("xx", KeywordName::Scenario), "Scenario");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    default_language: String,
    default_keywords: LanguageKeywords,
    languages: BTreeMap<String, LanguageKeywords>,
}

impl KeywordTable {
    /// Create a table whose fallback language is `default_language`.
    #[must_use]
    pub fn new(default_language: &str, keywords: LanguageKeywords) -> Self {
        let code = normalise_code(default_language);
        let mut languages = BTreeMap::new();
        languages.insert(code.clone(), keywords);
        Self {
            default_language: code,
            default_keywords: keywords,
            languages,
        }
    }

    /// Add or replace the keywords of a language.
    ///
    /// Replacing the default language also replaces the fallback keywords.
    #[must_use]
    pub fn with_language(mut self, language: &str, keywords: LanguageKeywords) -> Self {
        let code = normalise_code(language);
        if code == self.default_language {
            self.default_keywords = keywords;
        }
        self.languages.insert(code, keywords);
        self
    }

    /// The process-wide table holding the built-in `en` and `fi` keywords.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Code of the fallback language.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Whether the table has keywords for `language` itself, without falling
    /// back.
    #[must_use]
    pub fn supports(&self, language: &str) -> bool {
        self.languages.contains_key(&normalise_code(language))
    }

    /// Iterate over the configured languages and their keywords in code
    /// order.
    pub fn languages(&self) -> impl Iterator<Item = (&str, &LanguageKeywords)> {
        self.languages
            .iter()
            .map(|(code, keywords)| (code.as_str(), keywords))
    }

    /// Keywords for `language`, or the default language's when unknown.
    #[must_use]
    pub fn keywords(&self, language: &str) -> &LanguageKeywords {
        self.languages
            .get(&normalise_code(language))
            .unwrap_or(&self.default_keywords)
    }

    /// Resolve a logical keyword name to its literal in `language`.
    #[must_use]
    pub fn resolve(&self, language: &str, name: KeywordName) -> &'static str {
        self.keywords(language).get(name)
    }
}

fn normalise_code(language: &str) -> String {
    language.trim().to_ascii_lowercase()
}
