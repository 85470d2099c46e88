//! Catalogue to XML.

use std::fmt::{self, Write};
use std::io;

use super::{CatalogueError, ROOT_ELEMENT, TIME_FORMAT, write_escaped_attribute, write_escaped_text};
use crate::model::{Catalogue, Epic, Scenario, ScenarioStatus, Step, Steps, Story};

const INDENT: &str = "  ";

impl Catalogue {
    /// Render the catalogue as an XML report, every line ending in a newline.
    ///
    /// Attributes whose value is unset are omitted.
    ///
    /// # Errors
    /// Returns an error if writing to the provided formatter fails.
    pub fn write_xml<W: Write>(&self, writer: &mut W) -> fmt::Result {
        let extract_time = self
            .extract_time()
            .map(|time| time.format(TIME_FORMAT).to_string());
        let test_time = self
            .test_time()
            .map(|time| time.format(TIME_FORMAT).to_string());
        let attributes = [
            ("project", self.project()),
            ("extractTime", extract_time.as_deref()),
            ("testTime", test_time.as_deref()),
        ];
        if self.epics().is_empty() {
            return start_tag(writer, 0, ROOT_ELEMENT, &attributes, true);
        }
        start_tag(writer, 0, ROOT_ELEMENT, &attributes, false)?;
        for epic in self.epics() {
            write_epic(writer, epic)?;
        }
        end_tag(writer, 0, ROOT_ELEMENT)
    }

    /// The XML report as a string, without a trailing newline.
    ///
    /// # Examples
    /// ```
    /// use corejet::{Catalogue, Epic};
    ///
    /// assert_eq!(Catalogue::new().to_xml(), "<requirementscatalogue/>");
    ///
    /// let mut catalogue = Catalogue::new().with_project("Demo");
    /// catalogue.push_epic(Epic::new("E1", "First epic"));
    /// assert_eq!(
    ///     catalogue.to_xml(),
    ///     "<requirementscatalogue project=\"Demo\">\n  <epic id=\"E1\" title=\"First epic\"/>\n</requirementscatalogue>"
    /// );
    /// ```
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut document = String::new();
        if self.write_xml(&mut document).is_err() {
            log::error!("formatting the catalogue into a string failed");
        }
        if document.ends_with('\n') {
            document.pop();
        }
        document
    }

    /// Write the XML report followed by a newline to `writer`.
    ///
    /// # Errors
    /// Returns [`CatalogueError::Io`] if the stream cannot be written.
    pub fn write<W: io::Write>(&self, mut writer: W) -> Result<(), CatalogueError> {
        let mut document = self.to_xml();
        document.push('\n');
        writer.write_all(document.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn write_epic<W: Write>(writer: &mut W, epic: &Epic) -> fmt::Result {
    let attributes = [("id", Some(epic.id())), ("title", Some(epic.title()))];
    if epic.stories().is_empty() {
        return start_tag(writer, 1, "epic", &attributes, true);
    }
    start_tag(writer, 1, "epic", &attributes, false)?;
    for story in epic.stories() {
        write_story(writer, story)?;
    }
    end_tag(writer, 1, "epic")
}

fn write_story<W: Write>(writer: &mut W, story: &Story) -> fmt::Result {
    let points = story.points().map(|points| points.to_string());
    let attributes = [
        ("id", Some(story.id())),
        ("title", Some(story.title())),
        ("points", points.as_deref()),
        ("requirementStatus", story.status()),
        ("requirementResolution", story.resolution()),
        ("priority", story.priority()),
    ];
    if story.background().is_empty() && story.scenarios().is_empty() {
        return start_tag(writer, 2, "story", &attributes, true);
    }
    start_tag(writer, 2, "story", &attributes, false)?;
    write_steps(writer, 3, story.background())?;
    for scenario in story.scenarios() {
        write_scenario(writer, scenario)?;
    }
    end_tag(writer, 2, "story")
}

fn write_scenario<W: Write>(writer: &mut W, scenario: &Scenario) -> fmt::Result {
    let attributes = [
        ("name", Some(scenario.name())),
        ("testStatus", scenario.status().as_ref().map(ScenarioStatus::as_str)),
    ];
    if scenario.steps().is_empty() {
        return start_tag(writer, 3, "scenario", &attributes, true);
    }
    start_tag(writer, 3, "scenario", &attributes, false)?;
    write_steps(writer, 4, scenario.steps())?;
    end_tag(writer, 3, "scenario")
}

fn write_steps<W: Write>(writer: &mut W, depth: usize, steps: &Steps) -> fmt::Result {
    steps.iter().try_for_each(|step| write_step(writer, depth, step))
}

fn write_step<W: Write>(writer: &mut W, depth: usize, step: &Step) -> fmt::Result {
    let tag = step.kind().as_str();
    indent(writer, depth)?;
    write!(writer, "<{tag}>")?;
    write_escaped_text(writer, step.text())?;
    writeln!(writer, "</{tag}>")
}

fn start_tag<W: Write>(
    writer: &mut W,
    depth: usize,
    tag: &str,
    attributes: &[(&str, Option<&str>)],
    self_closing: bool,
) -> fmt::Result {
    indent(writer, depth)?;
    write!(writer, "<{tag}")?;
    for (name, value) in attributes {
        let Some(value) = value else { continue };
        write!(writer, " {name}=\"")?;
        write_escaped_attribute(writer, value)?;
        writer.write_char('"')?;
    }
    writer.write_str(if self_closing { "/>\n" } else { ">\n" })
}

fn end_tag<W: Write>(writer: &mut W, depth: usize, tag: &str) -> fmt::Result {
    indent(writer, depth)?;
    writeln!(writer, "</{tag}>")
}

fn indent<W: Write>(writer: &mut W, depth: usize) -> fmt::Result {
    (0..depth).try_for_each(|_| writer.write_str(INDENT))
}
