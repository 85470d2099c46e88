//! Behavioural tests: acceptance criteria appended to a story and
//! serialised as part of the catalogue report.

mod common;

use common::{catalogue_with, expected_document};
use corejet::{ParseError, Story, StoryParser, append_scenarios};

fn append(story: &mut Story, text: &str) {
    append_scenarios(story, text).unwrap_or_else(|error| panic!("criteria should parse: {error}"));
}

#[test]
fn but_continues_like_and() {
    let catalogue = catalogue_with(|story| {
        append(
            story,
            "Background:
Given some background
  And more background

Scenario: First scenario
Given something
When something happens
Then do something
  And something else
  But not this

Scenario: Second scenario
Given something
When something happens
Then do something
  And something else
",
        );
    });

    let expected = expected_document(
        "      <given>some background</given>
      <given>more background</given>
      <scenario name=\"First scenario\">
        <given>something</given>
        <when>something happens</when>
        <then>do something</then>
        <then>something else</then>
        <then>not this</then>
      </scenario>
      <scenario name=\"Second scenario\">
        <given>something</given>
        <when>something happens</when>
        <then>do something</then>
        <then>something else</then>
      </scenario>
",
    );
    assert_eq!(catalogue.to_xml(), expected);
}

#[test]
fn outline_rows_become_numbered_scenarios() {
    let catalogue = catalogue_with(|story| {
        append(
            story,
            "Scenario Outline: Count some apples
Given I have <Start amount> apples
When I get <Red> red and <Green> green apples more
Then I have a total of <Sum> apples

Examples:
| Start amount | Red | Green | Sum |
| 2            | 3   | 4     | 9   |
| 3            | 4   | 5     | 12  |
",
        );
    });

    let expected = expected_document(
        "      <scenario name=\"Count some apples #01\">
        <given>I have 2 apples</given>
        <when>I get 3 red and 4 green apples more</when>
        <then>I have a total of 9 apples</then>
      </scenario>
      <scenario name=\"Count some apples #02\">
        <given>I have 3 apples</given>
        <when>I get 4 red and 5 green apples more</when>
        <then>I have a total of 12 apples</then>
      </scenario>
",
    );
    assert_eq!(catalogue.to_xml(), expected);
}

#[test]
fn finnish_criteria_match_english_structure() {
    let catalogue = catalogue_with(|story| {
        append(
            story,
            "# language: fi

Tapaus: Ensimmäinen tapaus
Oletetaan, että ajan polkupyörällä,
  mutta minulla ei ole pyöräilykypärää.
Kun törmään liikenteessä autoon,
niin minulle käy tosi huonosti,
  mutta auton kuljettaja voi selvitä vammoitta.

Tapaus: Toinen tapaus
Oletetaan, että olen 1. ja 2. korttelin välissä.
Kun katson suoraan oikealle
niin näen uuden kirjakaupan
  ja kauniin näyteikkunan.

Tapaus: RTFM suomeksi
Oletetaan, että olen pulassa.
Kun klikkaan \"Ohjeet\"-linkkiä,
niin löydän apua.
",
        );
    });

    let expected = expected_document(
        "      <scenario name=\"Ensimmäinen tapaus\">
        <given>ajan polkupyörällä</given>
        <given>minulla ei ole pyöräilykypärää</given>
        <when>törmään liikenteessä autoon</when>
        <then>minulle käy tosi huonosti</then>
        <then>auton kuljettaja voi selvitä vammoitta</then>
      </scenario>
      <scenario name=\"Toinen tapaus\">
        <given>olen 1. ja 2. korttelin välissä</given>
        <when>katson suoraan oikealle</when>
        <then>näen uuden kirjakaupan</then>
        <then>kauniin näyteikkunan</then>
      </scenario>
      <scenario name=\"RTFM suomeksi\">
        <given>olen pulassa</given>
        <when>klikkaan 'Ohjeet'-linkkiä</when>
        <then>löydän apua</then>
      </scenario>
",
    );
    assert_eq!(catalogue.to_xml(), expected);
}

#[test]
fn finnish_and_english_blocks_are_equivalent() {
    let Ok(parser) = StoryParser::builtin() else {
        panic!("built-in keywords should compile");
    };
    let english = parser.parse("Scenario: Sama\nGiven a\nWhen b\nThen c\nAnd d\n");
    let finnish = parser.parse("# language: fi\nTapaus: Sama\nOletetaan, että a\nKun b\nniin c\nja d\n");
    assert_eq!(english.ok(), finnish.ok());
}

#[test]
fn then_after_given_is_rejected_and_story_kept() {
    let mut story = Story::new("S1", "Story");
    let result = append_scenarios(
        &mut story,
        "Scenario: Broken\nGiven something\nThen do something\n",
    );
    let Err(error) = result else {
        panic!("expected an ordering error");
    };
    assert!(matches!(error, ParseError::OutOfOrder { line_number: 3, .. }));
    assert_eq!(
        error.to_string(),
        "line 3: found `Then do something`, but previous step was given (line 2: `Given something`)"
    );
    assert!(story.scenarios().is_empty());
}
