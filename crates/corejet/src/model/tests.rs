//! Unit tests for the catalogue model.

use super::*;
use rstest::rstest;

#[test]
fn steps_are_grouped_by_kind_in_insertion_order() {
    let steps: Steps = [
        Step::given("a"),
        Step::then("c"),
        Step::when("b"),
        Step::given("a2"),
    ]
    .into_iter()
    .collect();
    let texts: Vec<_> = steps.iter().map(Step::text).collect();
    assert_eq!(texts, ["a", "a2", "b", "c"]);
    assert_eq!(steps.givens().len(), 2);
    assert_eq!(steps.len(), 4);
    assert!(!steps.is_empty());
}

#[test]
fn double_quotes_become_single_quotes() {
    let story = Story::new(r#"S"1"#, r#"The "best" story"#).with_priority(r#""high""#);
    assert_eq!(story.id(), "S'1");
    assert_eq!(story.title(), "The 'best' story");
    assert_eq!(story.priority(), Some("'high'"));
    let scenario = Scenario::new(r#"Click "Ohjeet""#);
    assert_eq!(scenario.name(), "Click 'Ohjeet'");
}

#[test]
fn empty_optional_values_stay_unset() {
    let story = Story::new("S1", "Story")
        .with_status("")
        .with_resolution("")
        .with_priority("");
    assert_eq!(story.status(), None);
    assert_eq!(story.resolution(), None);
    assert_eq!(story.priority(), None);
    assert_eq!(Catalogue::new().with_project("").project(), None);
}

#[test]
fn pushing_links_children_to_parents() {
    let mut story = Story::new("S1", "First story");
    story.push_scenario(Scenario::new("First scenario"));
    let mut epic = Epic::new("E1", "First epic");
    epic.push_story(story);

    let story = epic.stories().first();
    assert_eq!(story.and_then(Story::epic), Some("E1"));
    let scenario = story.and_then(|s| s.scenarios().first());
    assert_eq!(scenario.and_then(Scenario::story), Some("S1"));
}

#[test]
fn statuses_can_be_recorded_after_construction() {
    let mut story = Story::new("S1", "Story");
    story.push_scenario(Scenario::new("one"));
    for scenario in story.scenarios_mut() {
        scenario.set_status(Some(ScenarioStatus::Mismatch));
    }
    assert_eq!(
        story.scenarios().first().and_then(Scenario::status),
        Some(ScenarioStatus::Mismatch)
    );
}

#[rstest]
#[case("pass", ScenarioStatus::Pass)]
#[case("FAIL", ScenarioStatus::Fail)]
#[case(" pending ", ScenarioStatus::Pending)]
#[case("mismatch", ScenarioStatus::Mismatch)]
#[case("superfluous", ScenarioStatus::Superfluous)]
fn parses_scenario_status(#[case] input: &str, #[case] expected: ScenarioStatus) {
    assert_eq!(input.parse::<ScenarioStatus>(), Ok(expected));
    assert_eq!(expected.to_string(), expected.as_str());
}

#[test]
fn rejects_unknown_status() {
    assert_eq!(
        "skipped".parse::<ScenarioStatus>(),
        Err(UnknownLabel("skipped".into()))
    );
}

#[rstest]
#[case(StepKeyword::Given, Some(StepKind::Given))]
#[case(StepKeyword::When, Some(StepKind::When))]
#[case(StepKeyword::Then, Some(StepKind::Then))]
#[case(StepKeyword::And, None)]
#[case(StepKeyword::But, None)]
fn maps_keywords_to_kinds(#[case] keyword: StepKeyword, #[case] expected: Option<StepKind>) {
    assert_eq!(StepKind::from_keyword(keyword), expected);
}

#[test]
fn step_kinds_are_ordered() {
    assert!(StepKind::Given < StepKind::When);
    assert!(StepKind::When < StepKind::Then);
    assert_eq!("then".parse::<StepKind>(), Ok(StepKind::Then));
    assert!("scenario".parse::<StepKind>().is_err());
}

#[test]
fn finds_stories_across_epics() {
    let mut first = Epic::new("E1", "First");
    first.push_story(Story::new("S1", "One"));
    let mut second = Epic::new("E2", "Second");
    second.push_story(Story::new("S2", "Two"));
    let mut catalogue = Catalogue::new();
    catalogue.push_epic(first);
    catalogue.push_epic(second);

    assert_eq!(catalogue.stories().count(), 2);
    assert_eq!(catalogue.story("S2").map(Story::title), Some("Two"));
    assert!(catalogue.story("S3").is_none());
}
