// tests/tree_tests.rs

use sieve_filter::{
    ComparisonOperator, Expression, FilterError, LogicalOperator, join_tree, parse, split_tree,
};

fn eq(field: &str, value: i64) -> Expression {
    Expression::comparison(field, ComparisonOperator::Eq, value)
}

fn split_owned(expr: &Expression, op: LogicalOperator) -> Vec<Expression> {
    split_tree(expr, op).into_iter().cloned().collect()
}

// ============================================================================
// split_tree
// ============================================================================

#[test]
fn test_split_and_chain() {
    let tree = parse("A eq 1 and B eq 2 and C eq 3").unwrap();
    assert_eq!(
        split_owned(&tree, LogicalOperator::And),
        vec![eq("A", 1), eq("B", 2), eq("C", 3)]
    );
}

#[test]
fn test_split_keeps_other_operator_whole() {
    let tree = parse("Name eq 'Jacob' and (Age eq 30 or Age eq 40)").unwrap();
    let leaves = split_tree(&tree, LogicalOperator::And);

    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[1], &parse("Age eq 30 or Age eq 40").unwrap());
}

#[test]
fn test_split_by_absent_operator_returns_root() {
    let tree = parse("A eq 1 or B eq 2").unwrap();
    assert_eq!(split_tree(&tree, LogicalOperator::And), vec![&tree]);
}

#[test]
fn test_split_left_nested_chain() {
    let tree = parse("(A eq 1 and B eq 2) and (C eq 3 and D eq 4)").unwrap();
    assert_eq!(
        split_owned(&tree, LogicalOperator::And),
        vec![eq("A", 1), eq("B", 2), eq("C", 3), eq("D", 4)]
    );
}

#[test]
fn test_split_comparison_is_single_leaf() {
    let tree = eq("A", 1);
    assert_eq!(split_tree(&tree, LogicalOperator::Or), vec![&tree]);
}

#[test]
fn test_not_is_opaque_to_splitting() {
    let tree = parse("not (Name eq 'Jacob')").unwrap();
    let leaves = split_tree(&tree, LogicalOperator::And);
    assert_eq!(leaves, vec![&tree]);

    let tree = parse("not (A eq 1 and B eq 2)").unwrap();
    assert_eq!(split_tree(&tree, LogicalOperator::And), vec![&tree]);
}

#[test]
fn test_not_inside_chain_is_a_leaf() {
    let tree = parse("(not A eq 1) and B eq 2").unwrap();
    assert_eq!(
        split_owned(&tree, LogicalOperator::And),
        vec![Expression::negate(eq("A", 1)), eq("B", 2)]
    );
}

// ============================================================================
// join_tree
// ============================================================================

#[test]
fn test_join_builds_right_leaning_chain() {
    let joined = join_tree(vec![eq("A", 1), eq("B", 2), eq("C", 3)], LogicalOperator::Or).unwrap();
    assert_eq!(
        joined,
        Expression::or(eq("A", 1), Expression::or(eq("B", 2), eq("C", 3)))
    );
}

#[test]
fn test_join_single_leaf_is_unchanged() {
    assert_eq!(
        join_tree(vec![eq("A", 1)], LogicalOperator::And).unwrap(),
        eq("A", 1)
    );
}

#[test]
fn test_join_empty_fails() {
    assert_eq!(
        join_tree(vec![], LogicalOperator::And),
        Err(FilterError::EmptyJoin)
    );
}

#[test]
fn test_join_with_not_fails() {
    assert!(matches!(
        join_tree(vec![eq("A", 1), eq("B", 2)], LogicalOperator::Not),
        Err(FilterError::InvalidExpression(_))
    ));
}

// ============================================================================
// split/join law
// ============================================================================

#[test]
fn test_join_of_split_reconstructs_chain() {
    let cases = [
        ("A eq 1 and B eq 2 and C eq 3", LogicalOperator::And),
        ("A eq 1 or B eq 2 or C eq 3 or D eq 4", LogicalOperator::Or),
        ("A eq 1 and (B eq 2 or C eq 3) and (not D eq 4)", LogicalOperator::And),
        ("Name eq 'Jacob'", LogicalOperator::And),
        ("not (A eq 1 or B eq 2)", LogicalOperator::Or),
    ];

    for (filter, op) in cases {
        let tree = parse(filter).unwrap();
        let rebuilt = join_tree(split_owned(&tree, op), op).unwrap();
        assert_eq!(rebuilt, tree, "law failed for {:?}", filter);
    }
}
