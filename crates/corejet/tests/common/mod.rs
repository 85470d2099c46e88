//! Common fixtures for catalogue integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use corejet::{Catalogue, Epic, Story};

/// 2011-01-02 at the given time.
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2011, 1, 2)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

/// Catalogue with two epics; the first holds the stories `S1` and `S2`.
///
/// `fill` receives `S1` before it is added so a test can append criteria.
pub fn catalogue_with(fill: impl FnOnce(&mut Story)) -> Catalogue {
    let mut first = Story::new("S1", "First story")
        .with_points(3)
        .with_status("open")
        .with_priority("high");
    fill(&mut first);
    let second = Story::new("S2", "Second story")
        .with_points(3)
        .with_status("closed")
        .with_resolution("fixed")
        .with_priority("high");

    let mut epic = Epic::new("E1", "First epic");
    epic.push_story(first);
    epic.push_story(second);

    let mut catalogue = Catalogue::new()
        .with_project("Test project")
        .with_extract_time(at(12, 1));
    catalogue.push_epic(epic);
    catalogue.push_epic(Epic::new("E2", "Second epic"));
    catalogue
}

/// Wrap the `S1` body in the document produced by [`catalogue_with`].
pub fn expected_document(story_body: &str) -> String {
    format!(
        r#"<requirementscatalogue project="Test project" extractTime="2011-01-02T12:01:00">
  <epic id="E1" title="First epic">
    <story id="S1" title="First story" points="3" requirementStatus="open" priority="high">
{story_body}    </story>
    <story id="S2" title="Second story" points="3" requirementStatus="closed" requirementResolution="fixed" priority="high"/>
  </epic>
  <epic id="E2" title="Second epic"/>
</requirementscatalogue>"#
    )
}
