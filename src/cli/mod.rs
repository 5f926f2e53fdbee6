//! CLI support for sieve-filter
//!
//! Provides programmatic access to the `sieve` commands so other tools can
//! embed them without shelling out.

mod check;
mod convert;
mod docs;
mod group;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{groups_from_json, map_to_json, scalar_from_json, scalar_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use group::{GroupOptions, StringifyCommand, execute_group, execute_stringify};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Parse, serialize, or grouping error
    #[error("Filter error: {0}")]
    Filter(#[from] crate::FilterError),

    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON that is valid but does not describe groups
    #[error("Invalid groups: {0}")]
    InvalidGroups(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'sieve docs' to see available categories.")]
    UnknownCategory(String),
}
