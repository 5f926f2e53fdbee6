//! Validate filters and print them in canonical form

use super::CliError;
use crate::{ParseOptions, Parser, serialize};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter to check
    pub query: String,
    /// Only validate syntax, don't print the canonical form
    pub syntax_only: bool,
    /// Keep unrecognized value tokens as bare strings
    pub lenient: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// The filter re-rendered in canonical form
    Canonical(String),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let parse_options = if options.lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    };

    let expression = Parser::with_options(&options.query, parse_options).parse()?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    Ok(CheckResult::Canonical(serialize(&expression)?))
}
