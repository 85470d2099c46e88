//! Structural errors raised while parsing acceptance criteria.

use corejet_patterns::PatternError;
use thiserror::Error;

use crate::model::StepKind;

/// Errors that abort parsing of an acceptance-criteria text.
///
/// Every structural variant names the 1-based line number and the offending
/// line so authors can find it.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A step kind appeared after a kind that must follow it.
    #[error(
        "line {line_number}: found `{line}`, but previous step was {}",
        describe(.previous, .previous_line)
    )]
    OutOfOrder {
        /// 1-based line number.
        line_number: usize,
        /// Offending line.
        line: String,
        /// Kind of the offending step.
        found: StepKind,
        /// Kind of the step before it in the same block, if any.
        previous: Option<StepKind>,
        /// Line number and text of that previous step.
        previous_line: Option<(usize, String)>,
    },
    /// An `And`/`But` line with no preceding step in its block.
    #[error("line {line_number}: found `{line}`, but no previous step found")]
    ContinuationWithoutStep {
        /// 1-based line number.
        line_number: usize,
        /// Offending line.
        line: String,
    },
    /// An examples row whose cell count differs from the header row.
    #[error("line {line_number}: example row `{line}` has {found} cells, expected {expected}")]
    RowArity {
        /// 1-based line number.
        line_number: usize,
        /// Offending line.
        line: String,
        /// Number of columns in the header row.
        expected: usize,
        /// Number of cells in this row.
        found: usize,
    },
    /// A background header after a scenario or outline was opened.
    #[error("line {line_number}: `{line}` opens a background after a scenario")]
    BackgroundAfterScenario {
        /// 1-based line number.
        line_number: usize,
        /// Offending line.
        line: String,
    },
    /// An examples header outside a scenario outline.
    #[error("line {line_number}: `{line}` is not inside a scenario outline")]
    ExamplesOutsideOutline {
        /// 1-based line number.
        line_number: usize,
        /// Offending line.
        line: String,
    },
    /// A step line while an examples table was being read.
    #[error("line {line_number}: step `{line}` appears inside an examples table")]
    StepInExamples {
        /// 1-based line number.
        line_number: usize,
        /// Offending line.
        line: String,
    },
    /// The keyword matchers could not be compiled.
    #[error(transparent)]
    Keywords(#[from] PatternError),
}

fn describe(previous: &Option<StepKind>, previous_line: &Option<(usize, String)>) -> String {
    let kind = previous.as_ref().map_or("nothing", StepKind::as_str);
    previous_line.as_ref().map_or_else(
        || kind.to_string(),
        |(number, line)| format!("{kind} (line {number}: `{line}`)"),
    )
}

impl ParseError {
    /// Line number of a structural error; `None` for keyword failures.
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::OutOfOrder { line_number, .. }
            | Self::ContinuationWithoutStep { line_number, .. }
            | Self::RowArity { line_number, .. }
            | Self::BackgroundAfterScenario { line_number, .. }
            | Self::ExamplesOutsideOutline { line_number, .. }
            | Self::StepInExamples { line_number, .. } => Some(*line_number),
            Self::Keywords(_) => None,
        }
    }
}
