//! XML to catalogue.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{CatalogueError, ROOT_ELEMENT, TIME_FORMAT};
use crate::model::{Catalogue, Epic, Scenario, ScenarioStatus, Step, StepKind, Story};

type Attributes = BTreeMap<String, String>;

/// An element that is still open while the document is read.
#[derive(Debug)]
enum Open {
    Root,
    Epic(Epic),
    Story(Story),
    Scenario(Scenario),
    Step(StepKind, String),
    /// An element the catalogue does not know, skipped with its contents.
    Skipped(String),
}

impl Open {
    fn element(&self) -> &str {
        match self {
            Self::Root => ROOT_ELEMENT,
            Self::Epic(_) => "epic",
            Self::Story(_) => "story",
            Self::Scenario(_) => "scenario",
            Self::Step(kind, _) => kind.as_str(),
            Self::Skipped(name) => name,
        }
    }
}

impl Catalogue {
    /// Replace this catalogue's attributes and epics with the contents of an
    /// XML report.
    ///
    /// Unparseable timestamps, `points` and `testStatus` values are logged
    /// and left unset. Unknown elements are skipped. On error the catalogue
    /// is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] when the document is malformed, its root is
    /// not `requirementscatalogue`, or a known element sits under the wrong
    /// parent.
    pub fn populate<R: BufRead>(&mut self, source: R) -> Result<(), CatalogueError> {
        *self = read_catalogue(source)?;
        Ok(())
    }

    /// Parse a catalogue from an XML report held in memory.
    ///
    /// # Examples
    /// ```
    /// use corejet::Catalogue;
    ///
    /// let catalogue = Catalogue::from_xml(
    ///     r#"<requirementscatalogue project="Demo"><epic id="E1" title="First"/></requirementscatalogue>"#,
    /// )
    /// .expect("valid report");
    /// assert_eq!(catalogue.project(), Some("Demo"));
    /// assert_eq!(catalogue.epics().len(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Catalogue::populate`].
    pub fn from_xml(document: &str) -> Result<Self, CatalogueError> {
        read_catalogue(document.as_bytes())
    }
}

fn read_catalogue<R: BufRead>(source: R) -> Result<Catalogue, CatalogueError> {
    let mut reader = Reader::from_reader(source);
    let mut builder = Builder::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => builder.open(&start)?,
            Event::Empty(start) => {
                builder.open(&start)?;
                builder.close()?;
            }
            Event::End(_) => builder.close()?,
            Event::Text(text) => builder.text(&text.unescape()?),
            Event::CData(data) => builder.text(&String::from_utf8_lossy(&data)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    builder.finish()
}

#[derive(Debug, Default)]
struct Builder {
    catalogue: Option<Catalogue>,
    stack: Vec<Open>,
}

impl Builder {
    fn open(&mut self, start: &BytesStart<'_>) -> Result<(), CatalogueError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let Some(parent) = self.stack.last() else {
            return self.open_root(name, start);
        };
        if let Open::Skipped(_) = parent {
            self.stack.push(Open::Skipped(name));
            return Ok(());
        }

        let allowed = match name.as_str() {
            "epic" => matches!(parent, Open::Root),
            "story" => matches!(parent, Open::Epic(_)),
            "scenario" => matches!(parent, Open::Story(_)),
            "given" | "when" | "then" => matches!(parent, Open::Story(_) | Open::Scenario(_)),
            ROOT_ELEMENT => false,
            _ => {
                log::debug!("skipping unknown element `{name}` inside `{}`", parent.element());
                self.stack.push(Open::Skipped(name));
                return Ok(());
            }
        };
        if !allowed {
            return Err(CatalogueError::Misplaced {
                element: name,
                parent: parent.element().to_string(),
            });
        }

        let mut attributes = attributes(start)?;
        let open = match name.as_str() {
            "epic" => Open::Epic(Epic::new(
                required(&mut attributes, &name, "id"),
                required(&mut attributes, &name, "title"),
            )),
            "story" => Open::Story(read_story(&mut attributes)),
            "scenario" => Open::Scenario(read_scenario(&mut attributes)),
            step => match StepKind::from_str(step) {
                Ok(kind) => Open::Step(kind, String::new()),
                Err(_) => Open::Skipped(name.clone()),
            },
        };
        self.stack.push(open);
        Ok(())
    }

    fn open_root(&mut self, name: String, start: &BytesStart<'_>) -> Result<(), CatalogueError> {
        if name != ROOT_ELEMENT || self.catalogue.is_some() {
            return Err(CatalogueError::UnexpectedRoot { found: name });
        }
        let mut attributes = attributes(start)?;
        let mut catalogue = Catalogue::new();
        catalogue.set_header(
            attributes.remove("project"),
            timestamp(&mut attributes, "extractTime"),
            timestamp(&mut attributes, "testTime"),
        );
        self.catalogue = Some(catalogue);
        self.stack.push(Open::Root);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(Open::Step(_, buffer)) = self.stack.last_mut() {
            buffer.push_str(text);
        }
    }

    fn close(&mut self) -> Result<(), CatalogueError> {
        let Some(closed) = self.stack.pop() else {
            return Ok(());
        };
        match (closed, self.stack.last_mut()) {
            (Open::Step(kind, text), Some(Open::Story(story))) => {
                story.push_background_step(Step::new(text, kind));
            }
            (Open::Step(kind, text), Some(Open::Scenario(scenario))) => {
                scenario.push_step(Step::new(text, kind));
            }
            (Open::Scenario(scenario), Some(Open::Story(story))) => story.push_scenario(scenario),
            (Open::Story(story), Some(Open::Epic(epic))) => epic.push_story(story),
            (Open::Epic(epic), Some(Open::Root)) => {
                if let Some(catalogue) = self.catalogue.as_mut() {
                    catalogue.push_epic(epic);
                }
            }
            (Open::Root | Open::Skipped(_), _) => {}
            (other, parent) => {
                return Err(CatalogueError::Misplaced {
                    element: other.element().to_string(),
                    parent: parent.map_or_else(String::new, |open| open.element().to_string()),
                });
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Catalogue, CatalogueError> {
        if let Some(open) = self.stack.last() {
            return Err(CatalogueError::Truncated {
                element: open.element().to_string(),
            });
        }
        self.catalogue.ok_or(CatalogueError::MissingRoot)
    }
}

fn attributes(start: &BytesStart<'_>) -> Result<Attributes, CatalogueError> {
    let mut values = Attributes::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        values.insert(key, attribute.unescape_value()?.into_owned());
    }
    Ok(values)
}

fn required(attributes: &mut Attributes, element: &str, name: &str) -> String {
    attributes.remove(name).unwrap_or_else(|| {
        log::warn!("`{element}` element has no `{name}` attribute");
        String::new()
    })
}

fn read_story(attributes: &mut Attributes) -> Story {
    let mut story = Story::new(
        required(attributes, "story", "id"),
        required(attributes, "story", "title"),
    );
    if let Some(points) = attributes.remove("points") {
        match points.trim().parse::<u32>() {
            Ok(points) => story = story.with_points(points),
            Err(_) if points.trim().is_empty() => {}
            Err(error) => log::warn!("ignoring story points `{points}`: {error}"),
        }
    }
    if let Some(status) = attributes.remove("requirementStatus") {
        story = story.with_status(status);
    }
    if let Some(resolution) = attributes.remove("requirementResolution") {
        story = story.with_resolution(resolution);
    }
    if let Some(priority) = attributes.remove("priority") {
        story = story.with_priority(priority);
    }
    story
}

fn read_scenario(attributes: &mut Attributes) -> Scenario {
    let mut scenario = Scenario::new(required(attributes, "scenario", "name"));
    if let Some(status) = attributes.remove("testStatus") {
        match status.parse::<ScenarioStatus>() {
            Ok(status) => scenario.set_status(Some(status)),
            Err(_) if status.trim().is_empty() => {}
            Err(error) => log::warn!("ignoring test status: {error}"),
        }
    }
    scenario
}

/// Parse a report timestamp. Values with a UTC offset keep their local
/// wall-clock time.
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT).or_else(|error| {
        DateTime::parse_from_rfc3339(value)
            .map(|time| time.naive_local())
            .map_err(|_| error)
    })
}

fn timestamp(attributes: &mut Attributes, name: &str) -> Option<NaiveDateTime> {
    let value = attributes.remove(name)?;
    match parse_timestamp(value.trim()) {
        Ok(time) => Some(time),
        Err(_) if value.trim().is_empty() => None,
        Err(error) => {
            log::warn!("ignoring `{name}` value `{value}`: {error}");
            None
        }
    }
}
