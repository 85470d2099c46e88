//! XML round-trip for the requirements catalogue.
//!
//! The document has a fixed shape: a `requirementscatalogue` root holding
//! `epic` elements, which hold `story` elements, which hold the story's own
//! `given`/`when`/`then` steps followed by `scenario` elements. Output is
//! indented by two spaces per level and childless elements are self-closed,
//! so reports are stable enough to diff.

use std::fmt::{self, Write};
use std::io;

use thiserror::Error;

mod reader;
mod writer;


/// Format of the `extractTime` and `testTime` attributes.
///
/// Fractional seconds are written only when non-zero and are optional when
/// reading.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Name of the document root element.
pub const ROOT_ELEMENT: &str = "requirementscatalogue";

/// Errors raised while reading or writing a catalogue document.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// The document is not well-formed XML.
    #[error("malformed catalogue XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// The root element is not `requirementscatalogue`.
    #[error("expected root element `requirementscatalogue`, found `{found}`")]
    UnexpectedRoot {
        /// Name of the element found instead.
        found: String,
    },
    /// The document ended before any root element.
    #[error("catalogue document has no root element")]
    MissingRoot,
    /// A known element appeared under the wrong parent.
    #[error("element `{element}` is not allowed inside `{parent}`")]
    Misplaced {
        /// Element name.
        element: String,
        /// Name of the enclosing element.
        parent: String,
    },
    /// The document ended while `element` was still open.
    #[error("catalogue document ends inside `{element}`")]
    Truncated {
        /// Innermost unclosed element.
        element: String,
    },
    /// Reading or writing the underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Escape character data. Quotes are left alone.
pub(crate) fn write_escaped_text<W: Write>(writer: &mut W, value: &str) -> fmt::Result {
    write_escaped(writer, value, false)
}

/// Escape an attribute value for a double-quoted attribute.
pub(crate) fn write_escaped_attribute<W: Write>(writer: &mut W, value: &str) -> fmt::Result {
    write_escaped(writer, value, true)
}

fn write_escaped<W: Write>(writer: &mut W, value: &str, attribute: bool) -> fmt::Result {
    const INVALID_REPLACEMENT: &str = "&#xFFFD;";
    for character in value.chars() {
        if !is_valid_xml_character(character) {
            writer.write_str(INVALID_REPLACEMENT)?;
            continue;
        }
        match character {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            '"' if attribute => writer.write_str("&quot;")?,
            other => writer.write_char(other)?,
        }
    }
    Ok(())
}

fn is_valid_xml_character(character: char) -> bool {
    matches!(
        u32::from(character),
        0x09 | 0x0A | 0x0D
            | 0x20..=0xD7FF
            | 0xE000..=0xFFFD
            | 0x1_0000..=0x10_FFFF
    )
}
