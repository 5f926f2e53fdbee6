//! Grouping of flat predicate lists into per-field, per-operator value sets.
//!
//! `Name eq 'Jacob' and (Age eq 30 or Age eq 40)` groups into
//!
//! ```text
//! Name -> eq -> {'Jacob'}
//! Age  -> eq -> {30, 40}
//! ```
//!
//! and any such map can be turned back into filter text.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::{
    ast::{ComparisonOperator, Expression, LogicalOperator, Operand, Operator, Subject},
    error::{FilterError, Result},
    output::serialize,
    parser::{ParseOptions, parse_with},
    tree::{join_tree, split_tree},
    value::Scalar,
};

/// All values compared against one field with one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedExpression {
    pub subject: String,
    pub operator: ComparisonOperator,
    /// Distinct values; equality ignores order
    pub values: IndexSet<Scalar>,
}

/// Field name -> operator -> group.
pub type GroupedMap = IndexMap<String, IndexMap<ComparisonOperator, GroupedExpression>>;

impl GroupedExpression {
    pub fn new(subject: impl Into<String>, operator: ComparisonOperator) -> Self {
        GroupedExpression {
            subject: subject.into(),
            operator,
            values: IndexSet::new(),
        }
    }

    /// Builder-style helper mostly useful in tests and callers assembling groups by hand.
    pub fn with_values(mut self, values: impl IntoIterator<Item = Scalar>) -> Self {
        self.values.extend(values);
        self
    }
}

/// One (subject, operator, values) record taken from an input expression.
struct Contribution<'e> {
    subject: &'e str,
    operator: ComparisonOperator,
    values: Vec<&'e Scalar>,
}

fn describe(expression: &Expression) -> String {
    serialize(expression).unwrap_or_else(|_| format!("{:?}", expression))
}

fn contribution_of(expression: &Expression) -> Result<Contribution<'_>> {
    match expression {
        Expression::Comparison(comparison) => match &comparison.subject {
            Subject::Field(subject) => Ok(Contribution {
                subject,
                operator: comparison.operator,
                values: comparison.value.values().iter().collect(),
            }),
            Subject::Expression(_) => Err(FilterError::Ungroupable(describe(expression))),
        },
        Expression::Logical {
            operator: operator @ (LogicalOperator::And | LogicalOperator::Or),
            ..
        } => cluster_contribution(expression, *operator),
        Expression::Logical { .. } | Expression::Not(_) => {
            Err(FilterError::Ungroupable(describe(expression)))
        }
    }
}

/// A same-field cluster such as `Age eq 30 or Age eq 40` contributes one group.
fn cluster_contribution(expression: &Expression, operator: LogicalOperator) -> Result<Contribution<'_>> {
    let heterogeneous = || FilterError::HeterogeneousCluster(describe(expression));

    let mut subjects = IndexSet::new();
    let mut operators = IndexSet::new();
    let mut values = Vec::new();

    for leaf in split_tree(expression, operator) {
        let comparison = leaf.as_comparison().ok_or_else(heterogeneous)?;
        let subject = comparison.subject.field().ok_or_else(heterogeneous)?;

        subjects.insert(subject);
        operators.insert(comparison.operator);
        values.extend(comparison.value.values());
    }

    if subjects.len() != 1 || operators.len() != 1 {
        return Err(heterogeneous());
    }

    Ok(Contribution {
        subject: subjects[0],
        operator: operators[0],
        values,
    })
}

/// Group a flat list of predicates by subject and operator.
///
/// Typically fed with `split_tree(tree, LogicalOperator::And)`. Logical
/// entries must be clusters over a single subject and operator. When
/// `allowed_keys` is given, every subject must appear in it.
///
/// # Examples
///
/// ```
/// use sieve_filter::{get_map, parse, split_tree, ComparisonOperator, LogicalOperator, Scalar};
///
/// let tree = parse("Name eq 'Jacob' and (Age eq 30 or Age eq 40)").unwrap();
/// let map = get_map(split_tree(&tree, LogicalOperator::And), None).unwrap();
///
/// let ages = &map["Age"][&ComparisonOperator::Eq];
/// assert_eq!(ages.values.len(), 2);
/// assert!(ages.values.contains(&Scalar::Integer(40)));
/// ```
pub fn get_map<'e, I>(expressions: I, allowed_keys: Option<&[&str]>) -> Result<GroupedMap>
where
    I: IntoIterator<Item = &'e Expression>,
{
    let mut map = GroupedMap::new();

    for expression in expressions {
        let Contribution {
            subject,
            operator,
            values,
        } = contribution_of(expression)?;

        if let Some(keys) = allowed_keys
            && !keys.contains(&subject)
        {
            return Err(FilterError::UnknownSubject {
                subject: subject.to_string(),
                allowed: keys.iter().map(|k| k.to_string()).collect(),
            });
        }

        debug!(subject, %operator, count = values.len(), "grouping values");

        map.entry(subject.to_string())
            .or_default()
            .entry(operator)
            .or_insert_with(|| GroupedExpression::new(subject, operator))
            .values
            .extend(values.into_iter().cloned());
    }

    Ok(map)
}

/// Flatten a grouped map into its groups.
pub fn get_values_from_map(map: GroupedMap) -> Vec<GroupedExpression> {
    map.into_values()
        .flat_map(|operators| operators.into_values())
        .collect()
}

/// Expand each group back into one expression, joining its values with `operator`.
///
/// Groups without values produce nothing. Array-valued operators keep a
/// one-element list per value so the output parses back to the same shape.
pub fn ungroup_values(groups: &[GroupedExpression], operator: LogicalOperator) -> Result<Vec<Expression>> {
    groups
        .iter()
        .filter(|group| !group.values.is_empty())
        .map(|group| {
            let leaves = group
                .values
                .iter()
                .map(|value| {
                    let operand = if group.operator.is_array_valued() {
                        Operand::List(vec![value.clone()])
                    } else {
                        Operand::Scalar(value.clone())
                    };
                    Expression::Comparison(crate::ast::Comparison {
                        subject: Subject::Field(group.subject.clone()),
                        operator: group.operator,
                        value: operand,
                    })
                })
                .collect();
            join_tree(leaves, operator)
        })
        .collect()
}

/// Options for [`stringify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringifyOptions {
    /// Joins the per-group expressions
    pub operator: LogicalOperator,
    /// Joins the values inside one group
    pub sub_operator: LogicalOperator,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        StringifyOptions {
            operator: LogicalOperator::And,
            sub_operator: LogicalOperator::Or,
        }
    }
}

/// Parse a filter straight into its grouped map.
///
/// The tree is split by its root operator when that is `and` or `or`, and by
/// `and` otherwise. Blank input yields an empty map.
pub fn parse_grouped(
    query: &str,
    allowed_keys: Option<&[&str]>,
    options: ParseOptions,
) -> Result<GroupedMap> {
    if query.trim().is_empty() {
        return Ok(GroupedMap::new());
    }

    let tree = parse_with(query, options)?;
    let operator = match tree.operator() {
        Operator::Logical(op @ (LogicalOperator::And | LogicalOperator::Or)) => op,
        _ => LogicalOperator::And,
    };

    get_map(split_tree(&tree, operator), allowed_keys)
}

/// Render groups as filter text; no groups render as an empty string.
///
/// # Examples
///
/// ```
/// use sieve_filter::{get_values_from_map, parse_grouped, stringify, ParseOptions, StringifyOptions};
///
/// let map = parse_grouped("Name eq 'a' or Name eq 'b'", None, ParseOptions::default()).unwrap();
/// let text = stringify(&get_values_from_map(map), StringifyOptions::default()).unwrap();
/// assert_eq!(text, "Name eq 'a' or Name eq 'b'");
/// ```
pub fn stringify(groups: &[GroupedExpression], options: StringifyOptions) -> Result<String> {
    let expressions = ungroup_values(groups, options.sub_operator)?;
    if expressions.is_empty() {
        return Ok(String::new());
    }

    serialize(&join_tree(expressions, options.operator)?)
}
