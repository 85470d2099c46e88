//! Requirements catalogue model.
//!
//! The tree is strictly owned top-down: a [`Catalogue`] owns its [`Epic`]s,
//! an epic its [`Story`]s, a story its background [`Steps`] and
//! [`Scenario`]s. Back-references from a scenario to its story and from a
//! story to its epic are kept as the parent's identifier and are filled in
//! when the child is pushed into the parent.
//!
//! Every string that ends up in the XML report is normalised on the way in:
//! embedded double quotes become single quotes, and empty optional values are
//! treated as unset.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use corejet_patterns::StepKeyword;

#[cfg(test)]
mod tests;

/// Replace embedded double quotes so the value can always sit in an XML
/// attribute verbatim.
fn sanitise(value: impl Into<String>) -> String {
    let value = value.into();
    if value.contains('"') {
        value.replace('"', "'")
    } else {
        value
    }
}

fn optional(value: impl Into<String>) -> Option<String> {
    let value = sanitise(value);
    if value.is_empty() { None } else { Some(value) }
}

/// Canonical kind of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepKind {
    /// Precondition.
    Given,
    /// Action.
    When,
    /// Expected outcome.
    Then,
}

impl StepKind {
    /// Lowercase label, also used as the XML element name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
        }
    }

    /// Map a primary step keyword to its kind.
    ///
    /// Returns `None` for the `And`/`But` continuations, which have no kind of
    /// their own.
    #[must_use]
    pub const fn from_keyword(keyword: StepKeyword) -> Option<Self> {
        match keyword {
            StepKeyword::Given => Some(Self::Given),
            StepKeyword::When => Some(Self::When),
            StepKeyword::Then => Some(Self::Then),
            StepKeyword::And | StepKeyword::But => None,
        }
    }

    /// The primary keyword that introduces steps of this kind.
    #[must_use]
    pub const fn keyword(&self) -> StepKeyword {
        match self {
            Self::Given => StepKeyword::Given,
            Self::When => StepKeyword::When,
            Self::Then => StepKeyword::Then,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "given" => Ok(Self::Given),
            "when" => Ok(Self::When),
            "then" => Ok(Self::Then),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Error returned when a step kind or scenario status label is not
/// recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label `{0}`")]
pub struct UnknownLabel(pub String);

/// One given/when/then clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    text: String,
    kind: StepKind,
}

impl Step {
    /// Create a step of `kind`.
    ///
    /// # Examples
    /// ```
    /// use corejet::{Step, StepKind};
    ///
    /// let step = Step::new(r#"I click "Help""#, StepKind::When);
    /// assert_eq!(step.text(), "I click 'Help'");
    /// assert_eq!(step.kind(), StepKind::When);
    /// ```
    #[must_use]
    pub fn new(text: impl Into<String>, kind: StepKind) -> Self {
        Self {
            text: sanitise(text),
            kind,
        }
    }

    /// Shorthand for a `given` step.
    #[must_use]
    pub fn given(text: impl Into<String>) -> Self {
        Self::new(text, StepKind::Given)
    }

    /// Shorthand for a `when` step.
    #[must_use]
    pub fn when(text: impl Into<String>) -> Self {
        Self::new(text, StepKind::When)
    }

    /// Shorthand for a `then` step.
    #[must_use]
    pub fn then(text: impl Into<String>) -> Self {
        Self::new(text, StepKind::Then)
    }

    /// Step text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Step kind.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }
}

/// Ordered `given`, `when` and `then` step lists of a scenario or a story
/// background.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Steps {
    givens: Vec<Step>,
    whens: Vec<Step>,
    thens: Vec<Step>,
}

impl Steps {
    /// Create an empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the list matching its kind.
    pub fn push(&mut self, step: Step) {
        match step.kind {
            StepKind::Given => self.givens.push(step),
            StepKind::When => self.whens.push(step),
            StepKind::Then => self.thens.push(step),
        }
    }

    /// Append every step of `other`, keeping its order.
    pub fn extend(&mut self, other: Self) {
        self.givens.extend(other.givens);
        self.whens.extend(other.whens);
        self.thens.extend(other.thens);
    }

    /// `given` steps in insertion order.
    #[must_use]
    pub fn givens(&self) -> &[Step] {
        &self.givens
    }

    /// `when` steps in insertion order.
    #[must_use]
    pub fn whens(&self) -> &[Step] {
        &self.whens
    }

    /// `then` steps in insertion order.
    #[must_use]
    pub fn thens(&self) -> &[Step] {
        &self.thens
    }

    /// All steps: givens, then whens, then thens.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.givens
            .iter()
            .chain(self.whens.iter())
            .chain(self.thens.iter())
    }

    /// Total number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.givens.len() + self.whens.len() + self.thens.len()
    }

    /// Whether the block holds no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Step> for Steps {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        let mut steps = Self::new();
        for step in iter {
            steps.push(step);
        }
        steps
    }
}

/// Test status recorded against a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioStatus {
    /// Every step passed.
    Pass,
    /// A step failed.
    Fail,
    /// No test implements the scenario yet.
    Pending,
    /// A test exists but its steps differ from the requirement.
    Mismatch,
    /// A test exists for a scenario that is no longer required.
    Superfluous,
}

impl ScenarioStatus {
    /// Every status, in report order.
    pub const ALL: [Self; 5] = [
        Self::Pass,
        Self::Fail,
        Self::Pending,
        Self::Mismatch,
        Self::Superfluous,
    ];

    /// Lowercase label used in the `testStatus` attribute.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Pending => "pending",
            Self::Mismatch => "mismatch",
            Self::Superfluous => "superfluous",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioStatus {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLabel(trimmed.to_string()))
    }
}

/// One concrete example of a story's acceptance criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    steps: Steps,
    status: Option<ScenarioStatus>,
    story: Option<String>,
}

impl Scenario {
    /// Create a scenario without steps or status.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: sanitise(name),
            steps: Steps::new(),
            status: None,
            story: None,
        }
    }

    /// Append `step` while building.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Replace the steps while building.
    #[must_use]
    pub fn with_steps(mut self, steps: Steps) -> Self {
        self.steps = steps;
        self
    }

    /// Set the status while building.
    #[must_use]
    pub fn with_status(mut self, status: ScenarioStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All steps of the scenario.
    #[must_use]
    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    /// `given` steps in order.
    #[must_use]
    pub fn givens(&self) -> &[Step] {
        self.steps.givens()
    }

    /// `when` steps in order.
    #[must_use]
    pub fn whens(&self) -> &[Step] {
        self.steps.whens()
    }

    /// `then` steps in order.
    #[must_use]
    pub fn thens(&self) -> &[Step] {
        self.steps.thens()
    }

    /// Append a step.
    pub fn push_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Recorded test status, if any.
    #[must_use]
    pub fn status(&self) -> Option<ScenarioStatus> {
        self.status
    }

    /// Record or clear the test status.
    pub fn set_status(&mut self, status: Option<ScenarioStatus>) {
        self.status = status;
    }

    /// Identifier of the owning story once the scenario has been added to
    /// one.
    #[must_use]
    pub fn story(&self) -> Option<&str> {
        self.story.as_deref()
    }
}

/// A single requirement with its background and scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    id: String,
    title: String,
    background: Steps,
    scenarios: Vec<Scenario>,
    points: Option<u32>,
    status: Option<String>,
    resolution: Option<String>,
    priority: Option<String>,
    epic: Option<String>,
}

impl Story {
    /// Create a story with no background, scenarios or metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: sanitise(id),
            title: sanitise(title),
            background: Steps::new(),
            scenarios: Vec::new(),
            points: None,
            status: None,
            resolution: None,
            priority: None,
            epic: None,
        }
    }

    /// Set the story points while building.
    #[must_use]
    pub fn with_points(mut self, points: u32) -> Self {
        self.points = Some(points);
        self
    }

    /// Set the requirement status while building. Empty values leave it
    /// unset.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = optional(status);
        self
    }

    /// Set the requirement resolution while building. Empty values leave it
    /// unset.
    #[must_use]
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = optional(resolution);
        self
    }

    /// Set the priority while building. Empty values leave it unset.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = optional(priority);
        self
    }

    /// Append a background step while building.
    #[must_use]
    pub fn with_background_step(mut self, step: Step) -> Self {
        self.background.push(step);
        self
    }

    /// Story identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Story title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Background steps shared by every scenario.
    #[must_use]
    pub fn background(&self) -> &Steps {
        &self.background
    }

    /// Append a background step.
    pub fn push_background_step(&mut self, step: Step) {
        self.background.push(step);
    }

    /// Append every step of `steps` to the background.
    pub fn extend_background(&mut self, steps: Steps) {
        self.background.extend(steps);
    }

    /// Scenarios in encounter order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Mutable access to the scenarios, e.g. to record test statuses.
    pub fn scenarios_mut(&mut self) -> &mut [Scenario] {
        &mut self.scenarios
    }

    /// Append a scenario, linking it to this story.
    pub fn push_scenario(&mut self, mut scenario: Scenario) {
        scenario.story = Some(self.id.clone());
        self.scenarios.push(scenario);
    }

    /// Story points, if estimated.
    #[must_use]
    pub fn points(&self) -> Option<u32> {
        self.points
    }

    /// Requirement status, e.g. `open`.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Requirement resolution, e.g. `fixed`.
    #[must_use]
    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    /// Priority label.
    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Identifier of the owning epic once the story has been added to one.
    #[must_use]
    pub fn epic(&self) -> Option<&str> {
        self.epic.as_deref()
    }
}

/// A group of related stories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epic {
    id: String,
    title: String,
    stories: Vec<Story>,
}

impl Epic {
    /// Create an epic without stories.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: sanitise(id),
            title: sanitise(title),
            stories: Vec::new(),
        }
    }

    /// Epic identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Epic title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stories in order.
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Mutable access to the stories.
    pub fn stories_mut(&mut self) -> &mut [Story] {
        &mut self.stories
    }

    /// Append a story, linking it to this epic.
    pub fn push_story(&mut self, mut story: Story) {
        story.epic = Some(self.id.clone());
        self.stories.push(story);
    }
}

/// Root of the requirements tree and the unit of XML round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    extract_time: Option<NaiveDateTime>,
    test_time: Option<NaiveDateTime>,
    project: Option<String>,
    epics: Vec<Epic>,
}

impl Catalogue {
    /// Create an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project name while building. Empty values leave it unset.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = optional(project);
        self
    }

    /// Set the requirements extraction time while building.
    #[must_use]
    pub fn with_extract_time(mut self, time: NaiveDateTime) -> Self {
        self.extract_time = Some(time);
        self
    }

    /// Set the test run time while building.
    #[must_use]
    pub fn with_test_time(mut self, time: NaiveDateTime) -> Self {
        self.test_time = Some(time);
        self
    }

    /// Project name.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// When the requirements were extracted.
    #[must_use]
    pub fn extract_time(&self) -> Option<NaiveDateTime> {
        self.extract_time
    }

    /// When the tests were run.
    #[must_use]
    pub fn test_time(&self) -> Option<NaiveDateTime> {
        self.test_time
    }

    /// Record or clear the test run time.
    pub fn set_test_time(&mut self, time: Option<NaiveDateTime>) {
        self.test_time = time;
    }

    /// Epics in order.
    #[must_use]
    pub fn epics(&self) -> &[Epic] {
        &self.epics
    }

    /// Mutable access to the epics.
    pub fn epics_mut(&mut self) -> &mut [Epic] {
        &mut self.epics
    }

    /// Append an epic.
    pub fn push_epic(&mut self, epic: Epic) {
        self.epics.push(epic);
    }

    /// Iterate over every story of every epic.
    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.epics.iter().flat_map(|epic| epic.stories.iter())
    }

    /// Find a story by identifier.
    #[must_use]
    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories().find(|story| story.id == id)
    }

    pub(crate) fn set_header(
        &mut self,
        project: Option<String>,
        extract_time: Option<NaiveDateTime>,
        test_time: Option<NaiveDateTime>,
    ) {
        self.project = project.and_then(optional);
        self.extract_time = extract_time;
        self.test_time = test_time;
    }
}
