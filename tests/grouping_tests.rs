// tests/grouping_tests.rs

use chrono::NaiveDate;
use sieve_filter::{
    ComparisonOperator, Expression, FilterError, GroupedExpression, GroupedMap, LogicalOperator,
    ParseOptions, Scalar, StringifyOptions, get_map, get_values_from_map, parse, parse_grouped,
    split_tree, stringify, ungroup_values,
};

fn group_and(filter: &str) -> Result<GroupedMap, FilterError> {
    let tree = parse(filter).unwrap();
    get_map(split_tree(&tree, LogicalOperator::And), None)
}

fn values(map: &GroupedMap, subject: &str, op: ComparisonOperator) -> Vec<Scalar> {
    map[subject][&op].values.iter().cloned().collect()
}

// ============================================================================
// get_map
// ============================================================================

#[test]
fn test_group_simple_conjunction() {
    let map = group_and("Name eq 'Jacob' and Age eq 30").unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(values(&map, "Name", ComparisonOperator::Eq), vec![Scalar::from("Jacob")]);
    assert_eq!(values(&map, "Age", ComparisonOperator::Eq), vec![Scalar::Integer(30)]);
}

#[test]
fn test_group_merges_nested_or_cluster() {
    let map = group_and("Name eq 'Jacob' and (Age eq 30 or Age eq 40)").unwrap();

    assert_eq!(values(&map, "Name", ComparisonOperator::Eq), vec![Scalar::from("Jacob")]);
    assert_eq!(
        values(&map, "Age", ComparisonOperator::Eq),
        vec![Scalar::Integer(30), Scalar::Integer(40)]
    );
}

#[test]
fn test_group_merges_repeated_conjuncts() {
    let map = group_and("Name eq 'Jacob' and Age eq 30 and Age eq 40").unwrap();
    assert_eq!(
        values(&map, "Age", ComparisonOperator::Eq),
        vec![Scalar::Integer(30), Scalar::Integer(40)]
    );
}

#[test]
fn test_group_deduplicates_values() {
    let tree = parse("Name eq 'a' or Name eq 'a'").unwrap();
    let map = get_map(split_tree(&tree, LogicalOperator::Or), None).unwrap();
    assert_eq!(values(&map, "Name", ComparisonOperator::Eq), vec![Scalar::from("a")]);
}

#[test]
fn test_group_deduplicates_numbers_by_value() {
    let tree = parse("Age eq 30 or Age eq 30.0 or Age eq 31").unwrap();
    let map = get_map(split_tree(&tree, LogicalOperator::Or), None).unwrap();
    assert_eq!(
        values(&map, "Age", ComparisonOperator::Eq),
        vec![Scalar::Integer(30), Scalar::Integer(31)]
    );
    // First spelling wins
    assert!(matches!(
        map["Age"][&ComparisonOperator::Eq].values[0],
        Scalar::Integer(30)
    ));

    let tree = parse("Price eq 1.0 or Price eq 1.00 or Price eq 1").unwrap();
    let map = get_map(split_tree(&tree, LogicalOperator::Or), None).unwrap();
    assert_eq!(map["Price"][&ComparisonOperator::Eq].values.len(), 1);
}

#[test]
fn test_group_deduplicates_dates() {
    let map = group_and("(Created eq 2024-01-15 or Created eq 2024-01-15) and Created eq 2024-01-15")
        .unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    assert_eq!(
        values(&map, "Created", ComparisonOperator::Eq),
        vec![Scalar::Date(date)]
    );
}

#[test]
fn test_group_keeps_operators_apart() {
    let map = group_and("Age ge 18 and Age le 65 and Name startsWith 'J'").unwrap();

    assert_eq!(map["Age"].len(), 2);
    assert_eq!(values(&map, "Age", ComparisonOperator::Ge), vec![Scalar::Integer(18)]);
    assert_eq!(values(&map, "Age", ComparisonOperator::Le), vec![Scalar::Integer(65)]);
    assert_eq!(
        values(&map, "Name", ComparisonOperator::StartsWith),
        vec![Scalar::from("J")]
    );
}

#[test]
fn test_group_list_values() {
    let map = group_and("Name in ['Jacob', 'John'] and Name in ['John', 'Jane']").unwrap();
    assert_eq!(
        values(&map, "Name", ComparisonOperator::In),
        vec![Scalar::from("Jacob"), Scalar::from("John"), Scalar::from("Jane")]
    );
}

#[test]
fn test_grouped_expression_equality_ignores_order() {
    let a = GroupedExpression::new("Age", ComparisonOperator::Eq)
        .with_values([Scalar::Integer(30), Scalar::Integer(40)]);
    let b = GroupedExpression::new("Age", ComparisonOperator::Eq)
        .with_values([Scalar::Integer(40), Scalar::Integer(30)]);
    assert_eq!(a, b);
}

#[test]
fn test_heterogeneous_subjects_are_rejected() {
    assert!(matches!(
        group_and("Status eq 1 and (Name eq 'Jacob' or Age eq 30)"),
        Err(FilterError::HeterogeneousCluster(_))
    ));

    let cluster = parse("Name eq 'Jacob' or Age eq 30").unwrap();
    assert!(matches!(
        get_map([&cluster], None),
        Err(FilterError::HeterogeneousCluster(_))
    ));
}

#[test]
fn test_heterogeneous_operators_are_rejected() {
    assert!(matches!(
        group_and("Status eq 1 and (Age lt 18 or Age gt 65)"),
        Err(FilterError::HeterogeneousCluster(_))
    ));
}

#[test]
fn test_cluster_with_negation_is_rejected() {
    assert!(matches!(
        group_and("Status eq 1 and (Age eq 18 or (not Age eq 65))"),
        Err(FilterError::HeterogeneousCluster(_))
    ));
}

#[test]
fn test_negation_cannot_be_grouped() {
    assert!(matches!(
        group_and("Name eq 'Jacob' and (not Age eq 30)"),
        Err(FilterError::Ungroupable(_))
    ));
}

#[test]
fn test_allowed_keys() {
    let tree = parse("Name eq 'Jacob' and Age eq 30").unwrap();
    let leaves = split_tree(&tree, LogicalOperator::And);

    assert!(get_map(leaves.clone(), Some(&["Name", "Age"])).is_ok());
    assert_eq!(
        get_map(leaves, Some(&["Name"])),
        Err(FilterError::UnknownSubject {
            subject: "Age".to_string(),
            allowed: vec!["Name".to_string()],
        })
    );
}

// ============================================================================
// get_values_from_map / ungroup_values
// ============================================================================

#[test]
fn test_values_from_map() {
    let map = group_and("Name eq 'Jacob' and (Age eq 30 or Age eq 40)").unwrap();
    let mut groups = get_values_from_map(map);
    groups.sort_by(|a, b| a.subject.cmp(&b.subject));

    assert_eq!(
        groups,
        vec![
            GroupedExpression::new("Age", ComparisonOperator::Eq)
                .with_values([Scalar::Integer(30), Scalar::Integer(40)]),
            GroupedExpression::new("Name", ComparisonOperator::Eq)
                .with_values([Scalar::from("Jacob")]),
        ]
    );
}

#[test]
fn test_ungroup_values() {
    let groups = vec![
        GroupedExpression::new("Age", ComparisonOperator::Eq)
            .with_values([Scalar::Integer(30), Scalar::Integer(40)]),
        GroupedExpression::new("Name", ComparisonOperator::Eq).with_values([Scalar::from("Jacob")]),
        GroupedExpression::new("Empty", ComparisonOperator::Eq),
    ];

    let expressions = ungroup_values(&groups, LogicalOperator::Or).unwrap();
    assert_eq!(
        expressions,
        vec![
            Expression::or(
                Expression::comparison("Age", ComparisonOperator::Eq, 30),
                Expression::comparison("Age", ComparisonOperator::Eq, 40)
            ),
            Expression::comparison("Name", ComparisonOperator::Eq, "Jacob"),
        ]
    );
}

#[test]
fn test_ungroup_list_operator_keeps_lists() {
    let groups = vec![
        GroupedExpression::new("Name", ComparisonOperator::In)
            .with_values([Scalar::from("a"), Scalar::from("b")]),
    ];
    let expressions = ungroup_values(&groups, LogicalOperator::Or).unwrap();
    assert_eq!(
        expressions,
        vec![Expression::or(
            Expression::list("Name", ComparisonOperator::In, vec![Scalar::from("a")]),
            Expression::list("Name", ComparisonOperator::In, vec![Scalar::from("b")])
        )]
    );
}

// ============================================================================
// parse_grouped / stringify
// ============================================================================

#[test]
fn test_parse_grouped_uses_root_operator() {
    let map = parse_grouped(
        "Name eq 'a' or Name eq 'b' or Name eq 'c' or Name eq 'd'",
        None,
        ParseOptions::default(),
    )
    .unwrap();
    assert_eq!(
        values(&map, "Name", ComparisonOperator::Eq),
        vec![
            Scalar::from("a"),
            Scalar::from("b"),
            Scalar::from("c"),
            Scalar::from("d")
        ]
    );
}

#[test]
fn test_parse_grouped_single_comparison() {
    let map = parse_grouped("Name contains 'aco'", None, ParseOptions::default()).unwrap();
    assert_eq!(
        values(&map, "Name", ComparisonOperator::Contains),
        vec![Scalar::from("aco")]
    );
}

#[test]
fn test_parse_grouped_blank_is_empty() {
    assert!(parse_grouped("  ", None, ParseOptions::default()).unwrap().is_empty());
}

#[test]
fn test_parse_grouped_respects_keys() {
    assert!(matches!(
        parse_grouped("Email eq 'x'", Some(&["Name"]), ParseOptions::default()),
        Err(FilterError::UnknownSubject { .. })
    ));
}

#[test]
fn test_stringify_round_trip() {
    let filter = "Name eq 'Jacob' and (Age eq 30 or Age eq 40)";
    let map = parse_grouped(filter, None, ParseOptions::default()).unwrap();
    let text = stringify(&get_values_from_map(map), StringifyOptions::default()).unwrap();
    assert_eq!(text, filter);
}

#[test]
fn test_stringify_with_custom_operators() {
    let groups = vec![
        GroupedExpression::new("Age", ComparisonOperator::Ne)
            .with_values([Scalar::Integer(30), Scalar::Integer(40)]),
        GroupedExpression::new("Name", ComparisonOperator::Eq).with_values([Scalar::from("Jacob")]),
    ];
    let options = StringifyOptions {
        operator: LogicalOperator::Or,
        sub_operator: LogicalOperator::And,
    };
    assert_eq!(
        stringify(&groups, options).unwrap(),
        "(Age ne 30 and Age ne 40) or Name eq 'Jacob'"
    );
}

#[test]
fn test_stringify_nothing() {
    assert_eq!(stringify(&[], StringifyOptions::default()).unwrap(), "");
}
