//! Per-story test status counts for a catalogue report.
//!
//! Summaries render either as plain text, one line per story, or as JSON
//! with lowercase status labels so downstream tools can rely on consistent
//! keys.

use std::fmt;

use clap::ValueEnum;
use corejet::{Catalogue, ScenarioStatus, Story, TIME_FORMAT};
use serde::Serialize;

use crate::error::CliError;

/// Output format of the `summary` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per story.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Scenario counts per test status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Scenarios whose test passed.
    pub pass: usize,
    /// Scenarios whose test failed.
    pub fail: usize,
    /// Scenarios without a test yet.
    pub pending: usize,
    /// Scenarios whose test steps differ from the requirement.
    pub mismatch: usize,
    /// Tests for scenarios no longer required.
    pub superfluous: usize,
    /// Scenarios with no recorded status.
    pub untested: usize,
}

impl StatusCounts {
    fn record(&mut self, status: Option<ScenarioStatus>) {
        let slot = match status {
            Some(ScenarioStatus::Pass) => &mut self.pass,
            Some(ScenarioStatus::Fail) => &mut self.fail,
            Some(ScenarioStatus::Pending) => &mut self.pending,
            Some(ScenarioStatus::Mismatch) => &mut self.mismatch,
            Some(ScenarioStatus::Superfluous) => &mut self.superfluous,
            None => &mut self.untested,
        };
        *slot += 1;
    }
}

/// Counts for one story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorySummary {
    /// Identifier of the owning epic.
    pub epic: String,
    /// Story identifier.
    pub story: String,
    /// Story title.
    pub title: String,
    /// Number of scenarios.
    pub scenarios: usize,
    /// Scenario counts per status.
    #[serde(flatten)]
    pub counts: StatusCounts,
}

impl From<&Story> for StorySummary {
    fn from(story: &Story) -> Self {
        let mut counts = StatusCounts::default();
        for scenario in story.scenarios() {
            counts.record(scenario.status());
        }
        Self {
            epic: story.epic().unwrap_or_default().to_string(),
            story: story.id().to_string(),
            title: story.title().to_string(),
            scenarios: story.scenarios().len(),
            counts,
        }
    }
}

/// Counts for every story of a catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Project named on the report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// When the requirements were extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_time: Option<String>,
    /// When the tests ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_time: Option<String>,
    /// Per-story counts in catalogue order.
    pub stories: Vec<StorySummary>,
}

impl From<&Catalogue> for ReportSummary {
    fn from(catalogue: &Catalogue) -> Self {
        Self {
            project: catalogue.project().map(str::to_string),
            extract_time: catalogue
                .extract_time()
                .map(|time| time.format(TIME_FORMAT).to_string()),
            test_time: catalogue
                .test_time()
                .map(|time| time.format(TIME_FORMAT).to_string()),
            stories: catalogue.stories().map(StorySummary::from).collect(),
        }
    }
}

impl ReportSummary {
    /// Scenario counts across all stories.
    #[must_use]
    pub fn totals(&self) -> StatusCounts {
        self.stories
            .iter()
            .fold(StatusCounts::default(), |mut total, story| {
                total.pass += story.counts.pass;
                total.fail += story.counts.fail;
                total.pending += story.counts.pending;
                total.mismatch += story.counts.mismatch;
                total.superfluous += story.counts.superfluous;
                total.untested += story.counts.untested;
                total
            })
    }

    /// Render in `format`, ending with a newline.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Json`] if JSON encoding fails.
    pub fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pass {}, fail {}, pending {}, mismatch {}, superfluous {}, untested {}",
            self.pass, self.fail, self.pending, self.mismatch, self.superfluous, self.untested
        )
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(project) = &self.project {
            writeln!(f, "project: {project}")?;
        }
        if let Some(time) = &self.extract_time {
            writeln!(f, "extracted: {time}")?;
        }
        if let Some(time) = &self.test_time {
            writeln!(f, "tested: {time}")?;
        }
        for story in &self.stories {
            writeln!(
                f,
                "{}/{} {}: {} scenarios ({})",
                story.epic, story.story, story.title, story.scenarios, story.counts
            )?;
        }
        writeln!(f, "total: {}", self.totals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use corejet::{Epic, Scenario};
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalogue() -> Catalogue {
        let time = NaiveDate::from_ymd_opt(2011, 1, 2)
            .and_then(|date| date.and_hms_opt(12, 5, 0))
            .unwrap_or_default();
        let mut first = Story::new("S1", "First story");
        first.push_scenario(Scenario::new("A").with_status(ScenarioStatus::Pass));
        first.push_scenario(Scenario::new("B").with_status(ScenarioStatus::Mismatch));
        first.push_scenario(Scenario::new("C"));
        let mut second = Story::new("S2", "Second story");
        second.push_scenario(Scenario::new("D").with_status(ScenarioStatus::Fail));
        let mut epic = Epic::new("E1", "First epic");
        epic.push_story(first);
        epic.push_story(second);
        let mut catalogue = Catalogue::new()
            .with_project("Test project")
            .with_test_time(time);
        catalogue.push_epic(epic);
        catalogue
    }

    #[rstest]
    fn counts_scenarios_per_status(catalogue: Catalogue) {
        let summary = ReportSummary::from(&catalogue);
        let first = summary.stories.first().map(|story| story.counts);
        assert_eq!(
            first,
            Some(StatusCounts {
                pass: 1,
                mismatch: 1,
                untested: 1,
                ..StatusCounts::default()
            })
        );
        assert_eq!(summary.totals().fail, 1);
        assert_eq!(summary.totals().untested, 1);
    }

    #[rstest]
    fn renders_text(catalogue: Catalogue) {
        let text = ReportSummary::from(&catalogue)
            .render(OutputFormat::Text)
            .unwrap_or_else(|error| panic!("text rendering: {error}"));
        assert_eq!(
            text,
            "project: Test project\n\
             tested: 2011-01-02T12:05:00\n\
             E1/S1 First story: 3 scenarios (pass 1, fail 0, pending 0, mismatch 1, superfluous 0, untested 1)\n\
             E1/S2 Second story: 1 scenarios (pass 0, fail 1, pending 0, mismatch 0, superfluous 0, untested 0)\n\
             total: pass 1, fail 1, pending 0, mismatch 1, superfluous 0, untested 1\n"
        );
    }

    #[rstest]
    fn renders_json(catalogue: Catalogue) {
        let json = ReportSummary::from(&catalogue)
            .render(OutputFormat::Json)
            .unwrap_or_else(|error| panic!("json rendering: {error}"));
        let value: serde_json::Value =
            serde_json::from_str(&json).unwrap_or_else(|error| panic!("valid json: {error}"));
        let field = |pointer: &str| value.pointer(pointer).cloned();
        assert_eq!(field("/project"), Some("Test project".into()));
        assert_eq!(field("/test_time"), Some("2011-01-02T12:05:00".into()));
        assert_eq!(field("/extract_time"), None);
        assert_eq!(field("/stories/0/story"), Some("S1".into()));
        assert_eq!(field("/stories/0/pass"), Some(1.into()));
        assert_eq!(field("/stories/1/fail"), Some(1.into()));
    }

    #[test]
    fn empty_catalogue_has_zero_totals() {
        let summary = ReportSummary::from(&Catalogue::new());
        assert!(summary.stories.is_empty());
        assert_eq!(summary.totals(), StatusCounts::default());
        assert_eq!(
            summary.to_string(),
            "total: pass 0, fail 0, pending 0, mismatch 0, superfluous 0, untested 0\n"
        );
    }
}
