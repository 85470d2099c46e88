//! Library backing the `corejet` command line tool.
//!
//! The binary is a thin shell over these modules: configuration from the
//! environment, logging set-up, extraction of stories from acceptance-criteria
//! files, and summaries of catalogue reports.

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod summary;
