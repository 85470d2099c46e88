//! Core library for `corejet`.
//! This crate models a project's requirements catalogue, parses free-text
//! acceptance criteria into stories, and reads and writes the catalogue XML
//! report consumed by requirements dashboards.
//!
//! ```
//! use corejet::{Catalogue, Epic, Story, append_scenarios};
//!
//! let mut story = Story::new("S1", "First story").with_points(3);
//! append_scenarios(
//!     &mut story,
//!     "Scenario: First scenario\nGiven something\nWhen something happens\nThen do something\n",
//! )
//! .expect("criteria parse");
//!
//! let mut epic = Epic::new("E1", "First epic");
//! epic.push_story(story);
//! let mut catalogue = Catalogue::new().with_project("Test project");
//! catalogue.push_epic(epic);
//!
//! let xml = catalogue.to_xml();
//! assert!(xml.contains(r#"<scenario name="First scenario">"#));
//! assert_eq!(Catalogue::from_xml(&xml).expect("report parses"), catalogue);
//! ```

mod catalogue;
mod model;
mod parser;

pub use catalogue::{CatalogueError, ROOT_ELEMENT, TIME_FORMAT};
pub use corejet_patterns::{
    ClassifiedLine, DEFAULT_LANGUAGE, KeywordName, KeywordTable, LanguageKeywords, LineClassifier,
    PatternError, StepKeyword,
};
pub use model::{
    Catalogue, Epic, Scenario, ScenarioStatus, Step, StepKind, Steps, Story, UnknownLabel,
};
pub use parser::{
    ExampleRow, ParseError, ParsedCriteria, StoryParser, append_scenarios, expand_outline,
    outline_scenario_name, substitute_placeholders,
};
