//! JSON <-> grouped map conversion utilities

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value as Json};

use super::CliError;
use crate::{ComparisonOperator, GroupedExpression, GroupedMap, Scalar};

/// Convert a Scalar to serde_json::Value
///
/// Dates become `YYYY-MM-DD` strings.
pub fn scalar_to_json(value: &Scalar) -> Json {
    match value {
        Scalar::Null => Json::Null,
        Scalar::Boolean(b) => Json::Bool(*b),
        Scalar::Integer(n) => Json::Number((*n).into()),
        Scalar::Decimal(d) => serde_json::Number::from_str(&d.to_string())
            .map(Json::Number)
            .unwrap_or_else(|_| Json::String(d.to_string())),
        Scalar::String(s) => Json::String(s.clone()),
        Scalar::Date(date) => Json::String(date.format("%Y-%m-%d").to_string()),
    }
}

/// Convert serde_json::Value to a Scalar
///
/// Strings stay strings; arrays and objects are not scalars.
pub fn scalar_from_json(value: &Json) -> Result<Scalar, CliError> {
    match value {
        Json::Null => Ok(Scalar::Null),
        Json::Bool(b) => Ok(Scalar::Boolean(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Ok(Scalar::Integer(i)),
            None => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map(Scalar::Decimal)
                .map_err(|e| CliError::InvalidGroups(format!("number {}: {}", n, e))),
        },
        Json::String(s) => Ok(Scalar::String(s.clone())),
        other => Err(CliError::InvalidGroups(format!(
            "expected a scalar value, got {}",
            other
        ))),
    }
}

fn group_to_json(group: &GroupedExpression) -> Json {
    let mut obj = Map::new();
    obj.insert("subject".to_string(), Json::String(group.subject.clone()));
    obj.insert(
        "operator".to_string(),
        Json::String(group.operator.to_string()),
    );
    obj.insert(
        "values".to_string(),
        Json::Array(group.values.iter().map(scalar_to_json).collect()),
    );
    Json::Object(obj)
}

/// Convert a grouped map to `{subject: {operator: {subject, operator, values}}}`
pub fn map_to_json(map: &GroupedMap) -> Json {
    Json::Object(
        map.iter()
            .map(|(subject, operators)| {
                let operators = operators
                    .iter()
                    .map(|(operator, group)| (operator.to_string(), group_to_json(group)))
                    .collect();
                (subject.clone(), Json::Object(operators))
            })
            .collect(),
    )
}

fn group_from_json(value: &Json) -> Result<GroupedExpression, CliError> {
    let field = |name: &str| {
        value
            .get(name)
            .ok_or_else(|| CliError::InvalidGroups(format!("group is missing '{}'", name)))
    };

    let subject = field("subject")?
        .as_str()
        .ok_or_else(|| CliError::InvalidGroups("'subject' must be a string".to_string()))?;
    let operator = field("operator")?
        .as_str()
        .ok_or_else(|| CliError::InvalidGroups("'operator' must be a string".to_string()))?
        .parse::<ComparisonOperator>()?;
    let values = field("values")?
        .as_array()
        .ok_or_else(|| CliError::InvalidGroups("'values' must be an array".to_string()))?
        .iter()
        .map(scalar_from_json)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GroupedExpression::new(subject, operator).with_values(values))
}

/// Read groups from JSON.
///
/// Accepts either the shape produced by [`map_to_json`] or a flat array of
/// `{subject, operator, values}` objects.
pub fn groups_from_json(value: &Json) -> Result<Vec<GroupedExpression>, CliError> {
    match value {
        Json::Array(groups) => groups.iter().map(group_from_json).collect(),
        Json::Object(subjects) => {
            let mut groups = Vec::new();
            for operators in subjects.values() {
                let operators = operators.as_object().ok_or_else(|| {
                    CliError::InvalidGroups("expected an object of operators".to_string())
                })?;
                for group in operators.values() {
                    groups.push(group_from_json(group)?);
                }
            }
            Ok(groups)
        }
        other => Err(CliError::InvalidGroups(format!(
            "expected an object or array, got {}",
            other
        ))),
    }
}
