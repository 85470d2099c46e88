//! Classification of acceptance-criteria lines.
//!
//! A [`LineClassifier`] precompiles one set of matchers per language in a
//! [`KeywordTable`]. Classifying a line never fails: anything that is not a
//! directive, header, table row or step line is reported as
//! [`ClassifiedLine::Unrecognised`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{PatternError, matcher_error};
use crate::keyword::{KeywordName, StepKeyword};
use crate::table::{KeywordTable, LanguageKeywords};

static LANGUAGE_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#\s*language\s*:\s*([a-z]{2})\b"));

static TABLE_ROW_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\s*\|(.*)\|\s*$"));

const STEP_KEYWORDS: [StepKeyword; 5] = [
    StepKeyword::Given,
    StepKeyword::When,
    StepKeyword::Then,
    StepKeyword::And,
    StepKeyword::But,
];

/// Result of classifying one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    /// `# language: xx` directive carrying the lowercase language code.
    Language(String),
    /// Background header.
    Background,
    /// Scenario header with the scenario name.
    Scenario(String),
    /// Scenario outline header with the outline name.
    Outline(String),
    /// Examples header.
    Examples,
    /// `|`-delimited table row with trimmed cells.
    TableRow(Vec<String>),
    /// Step line with the keyword it was written with and its text.
    Step {
        /// Keyword that introduced the line.
        keyword: StepKeyword,
        /// Remaining text after the keyword.
        text: String,
    },
    /// Blank line, prose or anything else.
    Unrecognised,
}

#[derive(Debug, Clone)]
struct LanguageMatchers {
    background: Regex,
    scenario: Regex,
    outline: Regex,
    examples: Regex,
    steps: Vec<(StepKeyword, Regex)>,
    trailing_punctuation: &'static [char],
}

impl LanguageMatchers {
    fn compile(language: &str, keywords: &LanguageKeywords) -> Result<Self, PatternError> {
        let build = |pattern: String| Regex::new(&pattern).map_err(|e| matcher_error(language, e));
        let keyword = |name| keyword_pattern(keywords.get(name));

        let mut steps = Vec::with_capacity(STEP_KEYWORDS.len());
        for step in STEP_KEYWORDS {
            let pattern = format!(
                r"(?i)^\s*{}\s+(.+?)\s*$",
                keyword(KeywordName::for_step(step))
            );
            steps.push((step, build(pattern)?));
        }

        Ok(Self {
            background: build(format!(
                r"(?i)^\s*{}(?:\s*:.*)?\s*$",
                keyword(KeywordName::Background)
            ))?,
            scenario: build(header_pattern(&keyword(KeywordName::Scenario)))?,
            outline: build(header_pattern(&keyword(KeywordName::ScenarioOutline)))?,
            examples: build(format!(
                r"(?i)^\s*{}\s*:",
                keyword(KeywordName::Examples)
            ))?,
            steps,
            trailing_punctuation: keywords.trailing_punctuation,
        })
    }

    fn classify(&self, line: &str) -> ClassifiedLine {
        if let Some(name) = capture(&self.outline, line) {
            return ClassifiedLine::Outline(name.to_string());
        }
        if let Some(name) = capture(&self.scenario, line) {
            return ClassifiedLine::Scenario(name.to_string());
        }
        if self.examples.is_match(line) {
            return ClassifiedLine::Examples;
        }
        if self.background.is_match(line) {
            return ClassifiedLine::Background;
        }
        for (keyword, matcher) in &self.steps {
            if let Some(text) = capture(matcher, line) {
                return ClassifiedLine::Step {
                    keyword: *keyword,
                    text: self.strip_punctuation(text),
                };
            }
        }
        ClassifiedLine::Unrecognised
    }

    fn strip_punctuation(&self, text: &str) -> String {
        text.trim_end_matches(self.trailing_punctuation)
            .trim_end()
            .to_string()
    }
}

/// Escape a literal keyword, letting internal spaces match any run of
/// whitespace.
fn keyword_pattern(literal: &str) -> String {
    literal
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// `Keyword[ N]: name` with an optional numeric suffix.
fn header_pattern(keyword: &str) -> String {
    format!(r"(?i)^\s*{keyword}(?:\s+\d+)?\s*:\s*(.*?)\s*$")
}

fn capture<'t>(matcher: &Regex, line: &'t str) -> Option<&'t str> {
    matcher
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn static_matcher(
    cell: &'static LazyLock<Result<Regex, regex::Error>>,
) -> Result<&'static Regex, PatternError> {
    cell.as_ref().map_err(|e| PatternError::Regex(e.clone()))
}

/// Classifies lines against the keywords of every configured language.
///
/// # Examples
/// ```
/// use corejet_patterns::{ClassifiedLine, LineClassifier, StepKeyword};
///
/// let classifier = LineClassifier::builtin().expect("built-in keywords compile");
/// assert_eq!(
///     classifier.classify("  And more background", "en"),
///     ClassifiedLine::Step {
///         keyword: StepKeyword::And,
///         text: "more background".into(),
///     }
/// );
/// assert_eq!(
///     classifier.classify("Tapaus: Toinen tapaus", "fi"),
///     ClassifiedLine::Scenario("Toinen tapaus".into())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct LineClassifier {
    default_language: String,
    default_matchers: LanguageMatchers,
    matchers: BTreeMap<String, LanguageMatchers>,
    language: &'static Regex,
    table_row: &'static Regex,
}

impl LineClassifier {
    /// Compile matchers for every language in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when a keyword produces an invalid regular
    /// expression.
    pub fn new(table: &KeywordTable) -> Result<Self, PatternError> {
        let mut matchers = BTreeMap::new();
        for (code, keywords) in table.languages() {
            matchers.insert(code.to_string(), LanguageMatchers::compile(code, keywords)?);
        }
        let default_language = table.default_language().to_string();
        let default_matchers = LanguageMatchers::compile(
            &default_language,
            table.keywords(&default_language),
        )?;
        Ok(Self {
            default_language,
            default_matchers,
            matchers,
            language: static_matcher(&LANGUAGE_RE)?,
            table_row: static_matcher(&TABLE_ROW_RE)?,
        })
    }

    /// Classifier over [`KeywordTable::builtin`].
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the built-in keywords fail to compile.
    pub fn builtin() -> Result<Self, PatternError> {
        Self::new(KeywordTable::builtin())
    }

    /// Code of the language used when a requested language is unknown.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Classify `line` using the keywords of `language`.
    ///
    /// Unknown languages use the default language's keywords.
    #[must_use]
    pub fn classify(&self, line: &str, language: &str) -> ClassifiedLine {
        if let Some(code) = capture(self.language, line) {
            return ClassifiedLine::Language(code.to_ascii_lowercase());
        }
        if let Some(inner) = capture(self.table_row, line) {
            return ClassifiedLine::TableRow(split_cells(inner));
        }
        self.matchers_for(language).classify(line)
    }

    fn matchers_for(&self, language: &str) -> &LanguageMatchers {
        self.matchers
            .get(&language.trim().to_ascii_lowercase())
            .unwrap_or(&self.default_matchers)
    }
}

fn split_cells(inner: &str) -> Vec<String> {
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}
