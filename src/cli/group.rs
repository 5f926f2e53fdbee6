//! Group filters into JSON and render JSON groups back into filters

use super::{CliError, groups_from_json, map_to_json};
use crate::{LogicalOperator, ParseOptions, StringifyOptions, parse_grouped, stringify};

/// Options for the group command
#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
    /// The filter to group
    pub query: String,
    /// Allowed subjects; empty allows any
    pub keys: Vec<String>,
    /// Keep unrecognized value tokens as bare strings
    pub lenient: bool,
}

/// Options for the stringify command
#[derive(Debug, Clone)]
pub struct StringifyCommand {
    /// Grouped map or group array as JSON
    pub input: Option<String>,
    pub operator: LogicalOperator,
    pub sub_operator: LogicalOperator,
}

/// Parse and group a filter, returning the grouped map as JSON
pub fn execute_group(options: &GroupOptions) -> Result<serde_json::Value, CliError> {
    let parse_options = if options.lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    };

    let keys: Vec<&str> = options.keys.iter().map(String::as_str).collect();
    let allowed = (!keys.is_empty()).then_some(keys.as_slice());

    let map = parse_grouped(&options.query, allowed, parse_options)?;
    Ok(map_to_json(&map))
}

/// Render grouped JSON as filter text
pub fn execute_stringify(command: &StringifyCommand) -> Result<String, CliError> {
    let json_str = command.input.as_ref().ok_or(CliError::NoInput)?;
    let json: serde_json::Value = serde_json::from_str(json_str)?;
    let groups = groups_from_json(&json)?;

    let options = StringifyOptions {
        operator: command.operator,
        sub_operator: command.sub_operator,
    };
    Ok(stringify(&groups, options)?)
}
