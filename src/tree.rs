//! Flattening and rebuilding of logical chains.

use crate::{
    ast::{Expression, LogicalOperator},
    error::{FilterError, Result},
};

/// Flatten a chain of `operator` nodes into its leaves, left to right.
///
/// Negations are opaque: a `not` node is always returned whole, whatever
/// `operator` is. Nodes with any other operator are leaves.
///
/// # Examples
///
/// ```
/// use sieve_filter::{parse, split_tree, LogicalOperator};
///
/// let tree = parse("A eq 1 and (B eq 2 and C eq 3)").unwrap();
/// assert_eq!(split_tree(&tree, LogicalOperator::And).len(), 3);
///
/// let tree = parse("A eq 1 and (B eq 2 or C eq 3)").unwrap();
/// assert_eq!(split_tree(&tree, LogicalOperator::And).len(), 2);
/// ```
pub fn split_tree(expression: &Expression, operator: LogicalOperator) -> Vec<&Expression> {
    let mut leaves = Vec::new();
    collect_leaves(expression, operator, &mut leaves);
    leaves
}

fn collect_leaves<'e>(
    expression: &'e Expression,
    operator: LogicalOperator,
    leaves: &mut Vec<&'e Expression>,
) {
    match expression {
        Expression::Logical {
            subject,
            operator: op,
            value,
        } if *op == operator => {
            collect_leaves(subject, operator, leaves);
            collect_leaves(value, operator, leaves);
        }
        _ => leaves.push(expression),
    }
}

/// Rebuild a right-leaning `operator` chain from leaves.
///
/// A single leaf is returned unchanged. Fails with [`FilterError::EmptyJoin`]
/// when there are no leaves, and with [`FilterError::InvalidExpression`] when
/// asked to join several leaves with `not`.
pub fn join_tree(leaves: Vec<Expression>, operator: LogicalOperator) -> Result<Expression> {
    let mut leaves = leaves.into_iter().rev();
    let last = leaves.next().ok_or(FilterError::EmptyJoin)?;

    leaves.try_fold(last, |value, subject| {
        if operator == LogicalOperator::Not {
            return Err(FilterError::InvalidExpression(
                "cannot join expressions with 'not'".to_string(),
            ));
        }
        Ok(Expression::logical(subject, operator, value))
    })
}

#[test]
fn test_not_is_opaque() {
    let not = Expression::negate(Expression::and(
        Expression::comparison("A", crate::ComparisonOperator::Eq, 1),
        Expression::comparison("B", crate::ComparisonOperator::Eq, 2),
    ));
    assert_eq!(split_tree(&not, LogicalOperator::Not), vec![&not]);
    assert_eq!(split_tree(&not, LogicalOperator::And), vec![&not]);
}

#[test]
fn test_join_single_leaf_with_not() {
    let leaf = Expression::comparison("A", crate::ComparisonOperator::Eq, 1);
    assert_eq!(join_tree(vec![leaf.clone()], LogicalOperator::Not), Ok(leaf));
}
