use crate::{
    ast::{ComparisonOperator, LogicalOperator, Operator},
    value::Scalar,
};

/// Predicate tree node produced by the parser.
///
/// Trees are plain owned values: a parse builds one, nothing shares or
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A single predicate on a field
    ///
    /// # Example
    /// ```text
    /// Age eq 30
    /// Name in ['Jacob', 'John']
    /// ```
    Comparison(Comparison),

    /// Binary logical node (`and` / `or`)
    ///
    /// Chains lean right: `A and B and C` is `A and (B and C)`, so `value`
    /// holds the continuation.
    ///
    /// # Example
    /// ```text
    /// Name eq 'Jacob' and Age eq 30
    /// ```
    Logical {
        subject: Box<Expression>,
        operator: LogicalOperator,
        value: Box<Expression>,
    },

    /// Negation; carries no value.
    ///
    /// # Example
    /// ```text
    /// not (Name eq 'Jacob' or Age eq 30)
    /// ```
    Not(Box<Expression>),
}

/// `<subject> <operator> <value>` leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub subject: Subject,
    pub operator: ComparisonOperator,
    pub value: Operand,
}

/// Left-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    /// Field name (the parser only ever produces this)
    Field(String),

    /// Nested expression; only built programmatically.
    Expression(Box<Expression>),
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Scalar),
    /// Ordered values of an array-valued operator such as `in`
    List(Vec<Scalar>),
}

impl Operand {
    /// The compared values: one for a scalar, all of them for a list.
    pub fn values(&self) -> &[Scalar] {
        match self {
            Operand::Scalar(value) => std::slice::from_ref(value),
            Operand::List(values) => values,
        }
    }
}

impl Subject {
    pub fn field(&self) -> Option<&str> {
        match self {
            Subject::Field(name) => Some(name),
            Subject::Expression(_) => None,
        }
    }
}

impl Expression {
    /// Build a field comparison with a single value.
    pub fn comparison(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<Scalar>,
    ) -> Self {
        Expression::Comparison(Comparison {
            subject: Subject::Field(field.into()),
            operator,
            value: Operand::Scalar(value.into()),
        })
    }

    /// Build a field comparison against a list of values.
    pub fn list(field: impl Into<String>, operator: ComparisonOperator, values: Vec<Scalar>) -> Self {
        Expression::Comparison(Comparison {
            subject: Subject::Field(field.into()),
            operator,
            value: Operand::List(values),
        })
    }

    pub fn logical(subject: Expression, operator: LogicalOperator, value: Expression) -> Self {
        Expression::Logical {
            subject: Box::new(subject),
            operator,
            value: Box::new(value),
        }
    }

    pub fn and(subject: Expression, value: Expression) -> Self {
        Self::logical(subject, LogicalOperator::And, value)
    }

    pub fn or(subject: Expression, value: Expression) -> Self {
        Self::logical(subject, LogicalOperator::Or, value)
    }

    pub fn negate(subject: Expression) -> Self {
        Expression::Not(Box::new(subject))
    }

    pub fn operator(&self) -> Operator {
        match self {
            Expression::Comparison(comparison) => Operator::Comparison(comparison.operator),
            Expression::Logical { operator, .. } => Operator::Logical(*operator),
            Expression::Not(_) => Operator::Logical(LogicalOperator::Not),
        }
    }

    /// True for `and`, `or` and `not` nodes.
    pub fn is_logical(&self) -> bool {
        self.operator().is_logical()
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Expression::Comparison(comparison) => Some(comparison),
            _ => None,
        }
    }
}
