//! Stories extracted from acceptance-criteria files.
//!
//! Each file holds one story. The file stem is the story identifier and the
//! first line of prose, if any, is its title.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use corejet::{Catalogue, ClassifiedLine, Epic, Story, StoryParser};
use tracing::debug;

use crate::error::CliError;

/// Project and epic labels plus the files to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Project recorded on the catalogue.
    pub project: String,
    /// Identifier of the epic holding every extracted story.
    pub epic_id: String,
    /// Title of that epic.
    pub epic_title: String,
    /// Criteria files, one story each.
    pub files: Vec<PathBuf>,
}

/// First non-blank line that is not a directive, header, table row or step.
///
/// # Examples
/// ```
/// use corejet::StoryParser;
/// use corejet_cli::extract::story_title;
///
/// let parser = StoryParser::builtin().expect("built-in keywords compile");
/// let text = "\nAs a cyclist I want a helmet\n\nScenario: Ride\nGiven a bike\n";
/// assert_eq!(
///     story_title(&parser, text).as_deref(),
///     Some("As a cyclist I want a helmet")
/// );
/// ```
#[must_use]
pub fn story_title(parser: &StoryParser, text: &str) -> Option<String> {
    let mut language = parser.default_language().to_string();
    for line in text.lines() {
        match parser.classifier().classify(line, &language) {
            ClassifiedLine::Language(code) => language = code,
            ClassifiedLine::Unrecognised if !line.trim().is_empty() => {
                return Some(line.trim().to_string());
            }
            _ => {}
        }
    }
    None
}

/// Build the story held in `text`, identified as `id`.
///
/// # Errors
///
/// Returns the parser's error when the criteria are malformed.
pub fn story_from_text(
    parser: &StoryParser,
    id: &str,
    text: &str,
) -> Result<Story, corejet::ParseError> {
    let title = story_title(parser, text).unwrap_or_else(|| id.to_string());
    let mut story = Story::new(id, title);
    parser.append_scenarios(&mut story, text)?;
    Ok(story)
}

/// Read and parse one criteria file.
///
/// # Errors
///
/// Returns [`CliError::Read`] when the file cannot be read and
/// [`CliError::Parse`] when its criteria are malformed.
pub fn read_story(parser: &StoryParser, path: &Path) -> Result<Story, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let story = story_from_text(parser, &id, &text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        story = story.id(),
        scenarios = story.scenarios().len(),
        "parsed {}",
        path.display()
    );
    Ok(story)
}

/// Build a catalogue holding one epic with a story per file.
///
/// # Errors
///
/// Returns the first file's read or parse failure.
pub fn extract(
    parser: &StoryParser,
    options: &ExtractOptions,
    extract_time: NaiveDateTime,
) -> Result<Catalogue, CliError> {
    let mut epic = Epic::new(options.epic_id.as_str(), options.epic_title.as_str());
    for path in &options.files {
        epic.push_story(read_story(parser, path)?);
    }
    let mut catalogue = Catalogue::new()
        .with_project(options.project.as_str())
        .with_extract_time(extract_time);
    catalogue.push_epic(epic);
    Ok(catalogue)
}
