//! Scenario outline expansion.
//!
//! An outline buffers templated steps; every data row of its examples table
//! yields one concrete [`Scenario`] whose `<name>` placeholders are replaced
//! by the row's values.

use std::collections::BTreeMap;

use crate::model::{Scenario, Step, Steps};

/// Values of one examples row keyed by column name.
pub type ExampleRow = BTreeMap<String, String>;

/// Name of the `index`-th (1-based) scenario expanded from `outline`.
///
/// # Examples
/// ```
/// use corejet::outline_scenario_name;
///
/// assert_eq!(outline_scenario_name("Count some apples", 1), "Count some apples #01");
/// assert_eq!(outline_scenario_name("Big table", 120), "Big table #120");
/// ```
#[must_use]
pub fn outline_scenario_name(outline: &str, index: usize) -> String {
    format!("{outline} #{index:02}")
}

/// Replace every `<name>` placeholder in `template` with its value from
/// `row`.
///
/// Substitution is single pass, so values are never themselves expanded.
/// Placeholders without a matching column are kept verbatim.
///
/// # Examples
/// ```
/// use corejet::{ExampleRow, substitute_placeholders};
///
/// let row: ExampleRow = [("Start".to_string(), "2".to_string())].into();
/// assert_eq!(substitute_placeholders("I have <Start> <Unit>", &row), "I have 2 <Unit>");
/// ```
#[must_use]
pub fn substitute_placeholders(template: &str, row: &ExampleRow) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((before, after)) = rest.split_once('<') {
        out.push_str(before);
        match after.split_once('>') {
            Some((name, tail)) if !name.contains('<') => {
                let value = row
                    .get(name)
                    .map_or_else(|| format!("<{name}>"), String::clone);
                out.push_str(&value);
                rest = tail;
            }
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Build the concrete scenario `name` from an outline body and one row.
///
/// Step order and kinds are preserved.
#[must_use]
pub fn expand_outline(name: impl Into<String>, body: &Steps, row: &ExampleRow) -> Scenario {
    let steps = body
        .iter()
        .map(|step| Step::new(substitute_placeholders(step.text(), row), step.kind()))
        .collect();
    Scenario::new(name).with_steps(steps)
}

/// Where an outline is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Phase {
    /// Collecting templated steps.
    Body,
    /// An examples header was seen; the next table row names the columns.
    HeaderPending,
    /// Every further table row is a data row for these columns.
    Rows(Vec<String>),
}

/// An outline being parsed.
#[derive(Debug)]
pub(super) struct Outline {
    name: String,
    body: Steps,
    phase: Phase,
    expanded: usize,
}

impl Outline {
    pub(super) fn new(name: String) -> Self {
        Self {
            name,
            body: Steps::new(),
            phase: Phase::Body,
            expanded: 0,
        }
    }

    pub(super) fn phase(&self) -> &Phase {
        &self.phase
    }

    pub(super) fn push_step(&mut self, step: Step) {
        self.body.push(step);
    }

    pub(super) fn begin_examples(&mut self) {
        self.phase = Phase::HeaderPending;
    }

    pub(super) fn set_columns(&mut self, columns: Vec<String>) {
        self.phase = Phase::Rows(columns);
    }

    /// Expand one data row; the caller has checked its arity.
    pub(super) fn expand_row(&mut self, columns: &[String], cells: Vec<String>) -> Scenario {
        self.expanded += 1;
        let row: ExampleRow = columns.iter().cloned().zip(cells).collect();
        expand_outline(
            outline_scenario_name(&self.name, self.expanded),
            &self.body,
            &row,
        )
    }
}
