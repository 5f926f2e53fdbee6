//! # Sieve Filter Language - Abstract Syntax Tree
//!
//! This module defines the predicate tree for the filter language, a small
//! OData-style boolean language for describing which records a caller wants.
//!
//! ## Architecture Overview
//!
//! - **[expressions]** - Expression nodes (comparisons, logical nodes, negation)
//! - **[operators]** - Logical and comparison operators
//!
//! ## Quick Start
//!
//! ```text
//! Name eq 'Jacob' and (Age eq 30 or Age eq 40)
//! ```
//!
//! This filter matches records named Jacob aged either 30 or 40.
//!
//! ## Core Concepts
//!
//! ### Comparisons
//!
//! Every leaf has the shape `<field> <operator> <value>`:
//!
//! ```text
//! Age ge 18
//! Name startsWith 'Jac'
//! Tags in ['red', 'blue']
//! ```
//!
//! ### Logical Operators
//!
//! - **`and` / `or`** - join two expressions. Chains lean right.
//! - **`not`** - negates the expression that follows it.
//!
//! Precedence is positional: the first `and`/`or` in the text splits the
//! expression, so `A or B and C` reads as `A or (B and C)` and
//! `A and B or C` reads as `A and (B or C)`. Use parentheses to be explicit.
//!
//! ### Values
//!
//! - `'text'` - string (`\'` escapes a quote)
//! - `30`, `-7`, `19.99` - numbers
//! - `true`, `false` - booleans
//! - `2024-01-15` - date
//! - `null` - null
//! - `['a', 'b']` - list, for `in` and the relationship operators
pub mod expressions;
pub mod operators;

pub use expressions::{Comparison, Expression, Operand, Subject};
pub use operators::{ComparisonOperator, LogicalOperator, Operator};
