//! Filter text serialization.
//!
//! This module renders expression trees back into filter text. Output is
//! canonical: parsing the printed text yields the same tree, and every
//! filter written in canonical form prints back byte for byte.
//!
//! # Rendering Rules
//!
//! - **Strings** are single-quoted; `'` is escaped by a backslash, and `\` is
//!   escaped only where it would otherwise read as an escape
//! - **Numbers and booleans** print as literal text
//! - **Dates** print as a quoted ISO-8601 instant (`'2024-01-15T00:00:00.000Z'`)
//! - **Lists** print as `[a, b, c]`
//! - **Logical operands** that are themselves logical are parenthesized
//!
//! # Examples
//!
//! ```
//! use sieve_filter::{parse, serialize};
//!
//! let filter = "Name eq 'Jacob' and (Age eq 30 or Age eq 40)";
//! assert_eq!(serialize(&parse(filter).unwrap()).unwrap(), filter);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{Comparison, Expression, LogicalOperator, Operand, Subject, operators::is_keyword},
    error::{FilterError, Result},
};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

pub struct FilterPrinter;

impl FilterPrinter {
    pub fn new() -> Self {
        FilterPrinter
    }

    pub fn print(&self, expression: &Expression) -> Result<String> {
        match expression {
            Expression::Not(subject) => Ok(format!("not {}", self.print_operand(subject)?)),
            Expression::Logical {
                operator: LogicalOperator::Not,
                ..
            } => Err(FilterError::InvalidExpression(
                "'not' cannot join two expressions".to_string(),
            )),
            Expression::Logical {
                subject,
                operator,
                value,
            } => Ok(format!(
                "{} {} {}",
                self.print_operand(subject)?,
                operator,
                self.print_operand(value)?
            )),
            Expression::Comparison(comparison) => self.print_comparison(comparison),
        }
    }

    /// Operands of logical nodes get parentheses when they are logical themselves.
    fn print_operand(&self, expression: &Expression) -> Result<String> {
        let printed = self.print(expression)?;
        if expression.is_logical() {
            Ok(format!("({})", printed))
        } else {
            Ok(printed)
        }
    }

    fn print_comparison(&self, comparison: &Comparison) -> Result<String> {
        let subject = match &comparison.subject {
            Subject::Field(name) if IDENTIFIER.is_match(name) && !is_keyword(name) => name.clone(),
            Subject::Field(name) => {
                return Err(FilterError::InvalidExpression(format!(
                    "'{}' is not a valid subject",
                    name
                )));
            }
            Subject::Expression(expression) => format!("({})", self.print(expression)?),
        };

        let value = match &comparison.value {
            Operand::Scalar(value) => value.to_string(),
            Operand::List(values) if comparison.operator.is_array_valued() => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("[{}]", items.join(", "))
            }
            Operand::List(_) => {
                return Err(FilterError::InvalidExpression(format!(
                    "'{}' does not take a list of values",
                    comparison.operator
                )));
            }
        };

        Ok(format!("{} {} {}", subject, comparison.operator, value))
    }
}

impl Default for FilterPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an expression tree as canonical filter text.
///
/// Fails with [`FilterError::InvalidExpression`] for trees that could not be
/// parsed back: a binary node labelled `not`, a subject that is not a plain
/// identifier, or a list value on an operator that takes a single value.
pub fn serialize(expression: &Expression) -> Result<String> {
    FilterPrinter::new().print(expression)
}
