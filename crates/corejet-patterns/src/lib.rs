//! Keyword tables and line classification for CoreJet acceptance criteria.
//!
//! The crate holds the language-dependent layer of the parser: the logical
//! keyword names, the per-language literals they resolve to, and the
//! classifier that turns one physical line into a tagged
//! [`ClassifiedLine`]. The state machine that assembles stories lives in the
//! `corejet` crate.

mod classify;
mod errors;
mod keyword;
mod table;

pub use classify::{ClassifiedLine, LineClassifier};
pub use errors::PatternError;
pub use keyword::{KeywordName, KeywordNameParseError, StepKeyword};
pub use table::{DEFAULT_LANGUAGE, KeywordTable, LanguageKeywords};
