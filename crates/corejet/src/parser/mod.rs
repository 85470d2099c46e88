//! Acceptance-criteria parser.
//!
//! [`StoryParser`] runs a line-oriented state machine over free text,
//! collecting story-level (background) steps and scenarios. Scenario
//! outlines are expanded into one scenario per examples row as soon as the
//! row is read. Nothing is written to the target [`Story`] until the whole
//! text has parsed, so a failed parse leaves the story untouched.

use corejet_patterns::{ClassifiedLine, LineClassifier, StepKeyword};

use crate::model::{Scenario, Step, StepKind, Steps, Story};

mod error;
mod outline;

pub use error::ParseError;
pub use outline::{ExampleRow, expand_outline, outline_scenario_name, substitute_placeholders};

use outline::{Outline, Phase};


/// Steps and scenarios collected from one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCriteria {
    /// Steps written before any scenario, including the background block.
    pub background: Steps,
    /// Explicit and outline-expanded scenarios in encounter order.
    pub scenarios: Vec<Scenario>,
}

/// Parses acceptance criteria with an explicitly supplied classifier.
///
/// # Examples
/// ```
/// use corejet::{Story, StoryParser};
///
/// let parser = StoryParser::builtin().expect("built-in keywords compile");
/// let mut story = Story::new("S1", "Apples");
/// parser
///     .append_scenarios(
///         &mut story,
///         "Scenario: Eat\nGiven an apple\nWhen I eat it\nThen it is gone\n",
///     )
///     .expect("criteria parse");
/// assert_eq!(story.scenarios().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StoryParser {
    classifier: LineClassifier,
    default_language: String,
}

impl StoryParser {
    /// Create a parser whose default language is the classifier's.
    #[must_use]
    pub fn new(classifier: LineClassifier) -> Self {
        let default_language = classifier.default_language().to_string();
        Self {
            classifier,
            default_language,
        }
    }

    /// Parser over the built-in keyword table.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Keywords`] if the built-in keywords fail to
    /// compile.
    pub fn builtin() -> Result<Self, ParseError> {
        Ok(Self::new(LineClassifier::builtin()?))
    }

    /// Language used until the text declares another with
    /// `# language: xx`.
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Language used when the text declares none.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Classifier the parser matches lines with.
    #[must_use]
    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Parse `text` without touching any story.
    ///
    /// # Errors
    ///
    /// Returns a structural [`ParseError`] naming the first offending line.
    pub fn parse(&self, text: &str) -> Result<ParsedCriteria, ParseError> {
        let mut machine = Machine::new(self.default_language.clone());
        for (index, line) in text.lines().enumerate() {
            let classified = self.classifier.classify(line, &machine.language);
            machine.feed(index + 1, line, classified)?;
        }
        Ok(machine.finish())
    }

    /// Parse `text` and append its background steps and scenarios to
    /// `story`.
    ///
    /// # Errors
    ///
    /// Returns a structural [`ParseError`]; `story` is unchanged in that case.
    pub fn append_scenarios(&self, story: &mut Story, text: &str) -> Result<(), ParseError> {
        let parsed = self.parse(text)?;
        log::debug!(
            "story {}: {} background steps, {} scenarios",
            story.id(),
            parsed.background.len(),
            parsed.scenarios.len()
        );
        story.extend_background(parsed.background);
        for scenario in parsed.scenarios {
            story.push_scenario(scenario);
        }
        Ok(())
    }
}

/// Parse `text` with the built-in keywords (default language `en`) and
/// append the result to `story`.
///
/// # Errors
///
/// Returns a structural [`ParseError`]; `story` is unchanged in that case.
pub fn append_scenarios(story: &mut Story, text: &str) -> Result<(), ParseError> {
    StoryParser::builtin()?.append_scenarios(story, text)
}

/// What the current line's steps belong to.
#[derive(Debug)]
enum Scope {
    /// Before any header: steps are story-level.
    Story,
    Background,
    Scenario(Scenario),
    Outline(Outline),
}

/// Whether a primary step of kind `next` may follow `previous` in one block.
fn may_follow(previous: Option<StepKind>, next: StepKind) -> bool {
    match next {
        StepKind::Given => matches!(previous, None | Some(StepKind::Given)),
        StepKind::When => !matches!(previous, Some(StepKind::Then)),
        StepKind::Then => matches!(previous, Some(StepKind::When | StepKind::Then)),
    }
}

#[derive(Debug)]
struct Machine {
    language: String,
    scope: Scope,
    last: Option<StepKeyword>,
    /// Line number and text of the step that set `last`.
    last_line: Option<(usize, String)>,
    background: Steps,
    scenarios: Vec<Scenario>,
    seen_scenario: bool,
}

impl Machine {
    fn new(language: String) -> Self {
        Self {
            language,
            scope: Scope::Story,
            last: None,
            last_line: None,
            background: Steps::new(),
            scenarios: Vec::new(),
            seen_scenario: false,
        }
    }

    fn feed(
        &mut self,
        line_number: usize,
        line: &str,
        classified: ClassifiedLine,
    ) -> Result<(), ParseError> {
        match classified {
            ClassifiedLine::Language(code) => {
                log::debug!("line {line_number}: switching to language `{code}`");
                self.language = code;
            }
            ClassifiedLine::Background => {
                if self.seen_scenario {
                    return Err(ParseError::BackgroundAfterScenario {
                        line_number,
                        line: line.to_string(),
                    });
                }
                self.open_background();
            }
            ClassifiedLine::Scenario(name) => {
                self.seen_scenario = true;
                self.open(Scope::Scenario(Scenario::new(name)));
            }
            ClassifiedLine::Outline(name) => {
                self.seen_scenario = true;
                self.open(Scope::Outline(Outline::new(name)));
            }
            ClassifiedLine::Examples => {
                let Scope::Outline(outline) = &mut self.scope else {
                    return Err(ParseError::ExamplesOutsideOutline {
                        line_number,
                        line: line.to_string(),
                    });
                };
                outline.begin_examples();
            }
            ClassifiedLine::TableRow(cells) => self.table_row(line_number, line, cells)?,
            ClassifiedLine::Step { keyword, text } => {
                self.step(line_number, line, keyword, text)?;
            }
            ClassifiedLine::Unrecognised => {}
        }
        Ok(())
    }

    /// Close the current scope and enter `scope` with a fresh step history.
    fn open(&mut self, scope: Scope) {
        self.close();
        self.scope = scope;
        self.last = None;
        self.last_line = None;
    }

    /// Enter the background. Loose steps already in the story block share
    /// its ordering, so the step history carries over.
    fn open_background(&mut self) {
        if self.background.is_empty() {
            self.open(Scope::Background);
        } else {
            self.close();
            self.scope = Scope::Background;
        }
    }

    fn close(&mut self) {
        if let Scope::Scenario(scenario) = std::mem::replace(&mut self.scope, Scope::Story) {
            self.scenarios.push(scenario);
        }
    }

    fn table_row(
        &mut self,
        line_number: usize,
        line: &str,
        cells: Vec<String>,
    ) -> Result<(), ParseError> {
        let Scope::Outline(outline) = &mut self.scope else {
            log::debug!("line {line_number}: ignoring table row outside an examples table");
            return Ok(());
        };
        match outline.phase().clone() {
            Phase::Body => {
                log::debug!("line {line_number}: ignoring table row in an outline body");
            }
            Phase::HeaderPending => outline.set_columns(cells),
            Phase::Rows(columns) => {
                if cells.len() != columns.len() {
                    return Err(ParseError::RowArity {
                        line_number,
                        line: line.to_string(),
                        expected: columns.len(),
                        found: cells.len(),
                    });
                }
                let scenario = outline.expand_row(&columns, cells);
                self.scenarios.push(scenario);
            }
        }
        Ok(())
    }

    fn step(
        &mut self,
        line_number: usize,
        line: &str,
        keyword: StepKeyword,
        text: String,
    ) -> Result<(), ParseError> {
        if let Scope::Outline(outline) = &self.scope {
            if *outline.phase() != Phase::Body {
                return Err(ParseError::StepInExamples {
                    line_number,
                    line: line.to_string(),
                });
            }
        }

        let previous = self.last.and_then(StepKind::from_keyword);
        if let Some(kind) = StepKind::from_keyword(keyword) {
            if !may_follow(previous, kind) {
                return Err(ParseError::OutOfOrder {
                    line_number,
                    line: line.to_string(),
                    found: kind,
                    previous,
                    previous_line: self.last_line.clone(),
                });
            }
        }
        let Some(kind) = keyword
            .resolve(&mut self.last)
            .and_then(StepKind::from_keyword)
        else {
            return Err(ParseError::ContinuationWithoutStep {
                line_number,
                line: line.to_string(),
            });
        };

        self.last_line = Some((line_number, line.trim().to_string()));
        let step = Step::new(text, kind);
        match &mut self.scope {
            Scope::Story | Scope::Background => self.background.push(step),
            Scope::Scenario(scenario) => scenario.push_step(step),
            Scope::Outline(outline) => outline.push_step(step),
        }
        Ok(())
    }

    fn finish(mut self) -> ParsedCriteria {
        self.close();
        ParsedCriteria {
            background: self.background,
            scenarios: self.scenarios,
        }
    }
}
