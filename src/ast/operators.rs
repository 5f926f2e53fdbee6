use std::{fmt, str::FromStr};

use crate::error::FilterError;

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// Conjunction (`and`)
    And,
    /// Disjunction (`or`)
    Or,
    /// Negation (`not`)
    Not,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    // Equality
    /// Equal (`eq`)
    Eq,
    /// Not equal (`ne`)
    Ne,

    // Ordering
    /// Greater than (`gt`)
    Gt,
    /// Less than (`lt`)
    Lt,
    /// Greater than or equal (`ge`)
    Ge,
    /// Less than or equal (`le`)
    Le,

    // String
    /// Substring match (`contains`)
    Contains,
    /// Prefix match (`startsWith`)
    StartsWith,
    /// Suffix match (`endsWith`)
    EndsWith,
    /// Pattern match (`matches`)
    Matches,

    // Array-valued
    /// Membership (`in`)
    In,
    /// Relationship: at least one related item matches (`any`)
    Any,
    /// Relationship: every related item matches (`all`)
    All,
    /// Relationship: no related item matches (`none`)
    None,
    /// Relationship: exactly one related item matches (`single`)
    Single,
}

/// Either kind of operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Logical(LogicalOperator),
    Comparison(ComparisonOperator),
}

impl LogicalOperator {
    pub const ALL: [LogicalOperator; 3] = [Self::And, Self::Or, Self::Not];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 15] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::Matches,
        Self::In,
        Self::Any,
        Self::All,
        Self::None,
        Self::Single,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Ge => "ge",
            Self::Le => "le",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Matches => "matches",
            Self::In => "in",
            Self::Any => "any",
            Self::All => "all",
            Self::None => "none",
            Self::Single => "single",
        }
    }

    /// Operators whose value is a bracketed list, e.g. `Name in ['a', 'b']`.
    pub fn is_array_valued(&self) -> bool {
        matches!(
            self,
            Self::In | Self::Any | Self::All | Self::None | Self::Single
        )
    }
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Logical(op) => op.as_str(),
            Operator::Comparison(op) => op.as_str(),
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::Logical(_))
    }
}

/// True for words that can never be used as a subject.
pub fn is_keyword(word: &str) -> bool {
    LogicalOperator::ALL.iter().any(|op| op.as_str() == word)
        || ComparisonOperator::ALL.iter().any(|op| op.as_str() == word)
}

impl FromStr for LogicalOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| FilterError::InvalidExpression(format!("unknown logical operator '{}'", s)))
    }
}

impl FromStr for ComparisonOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                FilterError::InvalidExpression(format!("unknown comparison operator '{}'", s))
            })
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<LogicalOperator>()
            .map(Operator::Logical)
            .or_else(|_| s.parse::<ComparisonOperator>().map(Operator::Comparison))
            .map_err(|_| FilterError::InvalidExpression(format!("unknown operator '{}'", s)))
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogicalOperator> for Operator {
    fn from(op: LogicalOperator) -> Self {
        Operator::Logical(op)
    }
}

impl From<ComparisonOperator> for Operator {
    fn from(op: ComparisonOperator) -> Self {
        Operator::Comparison(op)
    }
}
