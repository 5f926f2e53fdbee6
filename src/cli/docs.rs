//! Documentation content for sieve CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Values,
    Grouping,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "values" | "value" | "types" => Some(Self::Values),
            "grouping" | "group" | "groups" => Some(Self::Grouping),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"SIEVE DOCUMENTATION

Sieve filters are OData-style boolean expressions over named fields. A filter
is parsed into a predicate tree that can be printed back in canonical form or
grouped per field and operator.

DOCUMENTATION CATEGORIES

  syntax            Comparisons, and/or/not, parentheses, precedence
  operators         Comparison and logical operators
  values            Strings, numbers, booleans, dates, null, lists
  grouping          Turning filters into per-field value sets and back

QUICK REFERENCE

  Age eq 30                         Comparison
  Name eq 'Jacob' and Age gt 18     Conjunction
  not (Age lt 18)                   Negation
  Name in ['Jacob', 'John']         List membership

Run 'sieve doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Values) => Ok(VALUES_DOC),
        Some(DocCategory::Grouping) => Ok(GROUPING_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

COMPARISONS
  <field> <operator> <value>

    Age eq 30
    Name startsWith 'Jac'

  Field names are letters, digits and underscores. Keywords (and, or, not,
  and every operator name) cannot be used as field names.

LOGICAL OPERATORS
  A and B        Both must hold
  A or B         Either must hold
  not A          A must not hold

PRECEDENCE
  The first 'and' or 'or' in the text splits the filter; everything after it
  is the right-hand side. 'and' does NOT bind tighter than 'or':

    A or B and C     reads as   A or (B and C)
    A and B or C     reads as   A and (B or C)

  'not' applies to everything after it:

    not A and B      reads as   not (A and B)

  Use parentheses to say what you mean:

    (not A) and B
    Name eq 'Jacob' and (Age eq 30 or Age eq 40)

QUOTING
  Keywords and parentheses inside quotes are plain text:

    title eq '1:1 Meeting between Alex and Pat (remote)'
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

EQUALITY
  eq             Equal
  ne             Not equal

ORDERING
  gt  lt         Greater / less than
  ge  le         Greater / less than or equal

STRINGS
  contains       Substring
  startsWith     Prefix
  endsWith       Suffix
  matches        Pattern

LISTS
  in             Value is one of a list:   Name in ['Jacob', 'John']
  any            Some related item matches
  all            Every related item matches
  none           No related item matches
  single         Exactly one related item matches

  List operators also accept a single value, which is read as a one-element
  list:  Name in 'Jacob'

LOGICAL
  and  or  not
"#;

const VALUES_DOC: &str = r#"VALUES

  'text'         String. Escape a quote as \' and a backslash as \\
                 (a backslash before any other character is kept as is)
  30  -7         Integer
  19.99          Decimal
  true  false    Boolean
  2024-01-15     Date (printed back as '2024-01-15T00:00:00.000Z')
  null           Null
  ['a', 2]       List (list operators only)

Anything else is rejected. Pass --lenient to keep unrecognized tokens as
bare strings instead:

  sieve check --lenient "Name eq Jacob"
  => Name eq 'Jacob'
"#;

const GROUPING_DOC: &str = r#"GROUPING

'sieve group' splits a filter on its top-level operator and collects the
values compared against each field, per operator. Duplicates collapse.

  sieve group "Name eq 'Jacob' and (Age eq 30 or Age eq 40)"
  => {"Age":{"eq":{"operator":"eq","subject":"Age","values":[30,40]}},
      "Name":{"eq":{"operator":"eq","subject":"Name","values":["Jacob"]}}}

A parenthesized part must compare ONE field with ONE operator:

  sieve group "Name eq 'Jacob' and (Age eq 30 or Name eq 'John')"
  => error: cannot group

Restrict the accepted fields with --keys:

  sieve group --keys Name,Age "Email eq 'a@b.c'"
  => error: subject "Email" does not match

'sieve stringify' turns groups back into a filter. Values inside a group are
joined with --sub-operator (default or), groups with --operator (default and):

  sieve group "Age eq 30 or Age eq 40" | sieve stringify
  => Age eq 30 or Age eq 40
"#;
