use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use tracing::trace;

use crate::{
    ast::{Comparison, ComparisonOperator, Expression, LogicalOperator, Operand, Subject},
    error::{FilterError, Result},
    scanner::{Scanner, find_separator, split_outside_quotes},
    value::{ValuePolicy, coerce},
};

const SYMBOL_PREFIX: &str = "@Sub_";
const SEPARATORS: [&str; 2] = [" and ", " or "];

static SYMBOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@Sub_(?<id>[0-9]+)$").unwrap());
static EMBEDDED_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@Sub_(?<id>[0-9]+)").unwrap());

static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    let operators = ComparisonOperator::ALL
        .iter()
        .map(|op| op.as_str())
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?s)^(?<subject>\w+)\s+(?<operator>{})\s+(?<value>.+)$",
        operators
    ))
    .unwrap()
});

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// How to treat value tokens that match no scalar form
    pub values: ValuePolicy,
}

impl ParseOptions {
    /// Options that keep unrecognized value tokens as bare strings.
    pub fn lenient() -> Self {
        ParseOptions {
            values: ValuePolicy::Lenient,
        }
    }
}

/// A parenthesized group and the text it was parsed from.
struct Binding {
    source: String,
    expression: Option<Expression>,
}

/// Recursive-descent parser for filter text.
///
/// Parenthesized groups are parsed first and replaced in the text by
/// placeholder symbols (`@Sub_0`, `@Sub_1`, ...). The symbol table lives in
/// the parser, so each parser owns the state of exactly one parse.
pub struct Parser<'a> {
    input: &'a str,
    options: ParseOptions,
    substitutions: Vec<Binding>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Parser {
            input,
            options,
            substitutions: Vec::new(),
        }
    }

    /// Parse the whole input into an expression tree
    pub fn parse(&mut self) -> Result<Expression> {
        self.substitutions.clear();

        if self.input.trim().is_empty() {
            return Err(FilterError::InvalidExpression("empty filter".to_string()));
        }
        self.parse_fragment(self.input)
    }

    fn parse_fragment(&mut self, fragment: &str) -> Result<Expression> {
        let fragment = self.resolve_parens(fragment.trim())?;
        let fragment = fragment.trim();

        if SYMBOL.is_match(fragment) {
            return self.resolve_symbol(fragment);
        }

        if let Some(rest) = fragment.strip_prefix("not ") {
            return Ok(Expression::Not(Box::new(self.parse_fragment(rest)?)));
        }

        if let Some((offset, separator)) = find_separator(fragment, &SEPARATORS) {
            let operator = separator.trim().parse::<LogicalOperator>()?;
            let left = &fragment[..offset];
            let right = &fragment[offset + separator.len()..];
            trace!(%operator, left, right, "split fragment");

            return Ok(Expression::Logical {
                subject: Box::new(self.parse_fragment(left)?),
                operator,
                value: Box::new(self.parse_fragment(right)?),
            });
        }

        self.parse_comparison(fragment)
    }

    /// Replace every top-level parenthesized group with a bound placeholder.
    fn resolve_parens<'f>(&mut self, fragment: &'f str) -> Result<Cow<'f, str>> {
        if !fragment.contains(['(', ')']) {
            return Ok(Cow::Borrowed(fragment));
        }

        let mut resolved = String::with_capacity(fragment.len());
        let mut depth = 0usize;
        let mut group_start = 0;

        for scanned in Scanner::new(fragment) {
            if scanned.is_structural() {
                match scanned.ch {
                    '(' => {
                        if depth == 0 {
                            group_start = scanned.offset + 1;
                        }
                        depth += 1;
                        continue;
                    }
                    ')' => {
                        if depth == 0 {
                            return Err(FilterError::UnmatchedParens(fragment.to_string()));
                        }
                        depth -= 1;
                        if depth == 0 {
                            let symbol = self.bind(&fragment[group_start..scanned.offset])?;
                            resolved.push_str(&symbol);
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            if depth == 0 {
                resolved.push(scanned.ch);
            }
        }

        if depth > 0 {
            return Err(FilterError::UnmatchedParens(fragment.to_string()));
        }
        Ok(Cow::Owned(resolved))
    }

    fn bind(&mut self, group: &str) -> Result<String> {
        let expression = self.parse_fragment(group)?;
        let symbol = format!("{}{}", SYMBOL_PREFIX, self.substitutions.len());
        trace!(%symbol, group, "bound parenthesized group");
        self.substitutions.push(Binding {
            source: group.to_string(),
            expression: Some(expression),
        });
        Ok(symbol)
    }

    fn resolve_symbol(&mut self, symbol: &str) -> Result<Expression> {
        symbol[SYMBOL_PREFIX.len()..]
            .parse::<usize>()
            .ok()
            .and_then(|id| self.substitutions.get_mut(id))
            .and_then(|binding| binding.expression.take())
            .ok_or_else(|| FilterError::UnknownSymbol(symbol.to_string()))
    }

    /// Put the text of bound groups back in place of their symbols.
    fn restore(&self, fragment: &str) -> String {
        EMBEDDED_SYMBOL
            .replace_all(fragment, |caps: &regex::Captures| {
                caps["id"]
                    .parse::<usize>()
                    .ok()
                    .and_then(|id| self.substitutions.get(id))
                    .map(|binding| format!("({})", binding.source))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn parse_comparison(&self, fragment: &str) -> Result<Expression> {
        let invalid = || FilterError::InvalidExpression(self.restore(fragment));

        let caps = COMPARISON.captures(fragment).ok_or_else(invalid)?;
        let subject = &caps["subject"];
        if crate::ast::operators::is_keyword(subject) {
            return Err(invalid());
        }

        let operator = caps["operator"].parse::<ComparisonOperator>()?;
        let token = caps["value"].trim();

        // A group in value position is an expression, never a value
        if find_separator(token, &[SYMBOL_PREFIX]).is_some() {
            return Err(invalid());
        }
        let value = self.parse_operand(operator, token)?;

        Ok(Expression::Comparison(Comparison {
            subject: Subject::Field(subject.to_string()),
            operator,
            value,
        }))
    }

    fn parse_operand(&self, operator: ComparisonOperator, token: &str) -> Result<Operand> {
        let policy = self.options.values;

        if !operator.is_array_valued() {
            return coerce(token, policy).map(Operand::Scalar);
        }

        let values = match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            Some(inner) if inner.trim().is_empty() => Vec::new(),
            Some(inner) => split_outside_quotes(inner, ',')
                .into_iter()
                .map(|element| match element.trim() {
                    "" => Err(FilterError::InvalidValue(token.to_string())),
                    element => coerce(element, policy),
                })
                .collect::<Result<Vec<_>>>()?,
            None => vec![coerce(token, policy)?],
        };
        Ok(Operand::List(values))
    }
}

/// Parse filter text with the default (strict) options.
///
/// # Examples
///
/// ```
/// use sieve_filter::{parse, Expression, ComparisonOperator};
///
/// let expr = parse("Age eq 30").unwrap();
/// assert_eq!(expr, Expression::comparison("Age", ComparisonOperator::Eq, 30));
/// ```
pub fn parse(input: &str) -> Result<Expression> {
    Parser::new(input).parse()
}

/// Parse filter text with explicit options.
pub fn parse_with(input: &str, options: ParseOptions) -> Result<Expression> {
    Parser::with_options(input, options).parse()
}
