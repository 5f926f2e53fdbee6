pub mod ast;
pub mod cli;
pub mod error;
pub mod grouping;
pub mod output;
pub mod parser;
pub mod scanner;
pub mod tree;
pub mod value;

pub use ast::{
    Comparison, ComparisonOperator, Expression, LogicalOperator, Operand, Operator, Subject,
};
pub use error::{FilterError, Result};
pub use grouping::{
    GroupedExpression, GroupedMap, StringifyOptions, get_map, get_values_from_map, parse_grouped,
    stringify, ungroup_values,
};
pub use output::{FilterPrinter, serialize};
pub use parser::{ParseOptions, Parser, parse, parse_with};
pub use tree::{join_tree, split_tree};
pub use value::{Scalar, ValuePolicy};
