//! Error types for the command line tool.

use std::io;
use std::path::PathBuf;

use corejet::{CatalogueError, ParseError};
use thiserror::Error;

/// Errors raised by the command line tool.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A criteria file could not be parsed.
    #[error("{}: {source}", path.display())]
    Parse {
        /// File holding the criteria.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: ParseError,
    },

    /// A criteria file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed to open or decode.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A catalogue report could not be read or written.
    #[error("catalogue report: {0}")]
    Catalogue(#[from] CatalogueError),

    /// A summary could not be encoded as JSON.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
