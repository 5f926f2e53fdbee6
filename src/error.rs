use thiserror::Error;

/// Errors produced while parsing, serializing, or grouping filter expressions.
///
/// Every operation in this crate either returns a complete result or fails
/// with one of these; there is no partial-result mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// An opening parenthesis without a matching close, or a stray `)`.
    #[error("Unmatched parentheses in: {0}")]
    UnmatchedParens(String),

    /// A placeholder symbol that is not bound to a parsed group.
    #[error("Symbol not found: {0}")]
    UnknownSymbol(String),

    /// A fragment that matches no grammar rule, or a node that cannot be rendered.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// A value token that coerces to no recognized scalar type.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A logical sub-tree that mixes subjects or operators.
    #[error("Cannot group {0}: clusters must share exactly one subject and one operator")]
    HeterogeneousCluster(String),

    /// A subject outside the caller-supplied allow-list.
    #[error("Subject \"{subject}\" does not match [{}]", allowed.join(", "))]
    UnknownSubject { subject: String, allowed: Vec<String> },

    /// A `not` node or an expression subject handed to the grouping engine.
    #[error("Expression cannot be grouped: {0}")]
    Ungroupable(String),

    /// `join_tree` called with no leaves.
    #[error("Cannot join an empty list of expressions")]
    EmptyJoin,
}

pub type Result<T> = std::result::Result<T, FilterError>;
