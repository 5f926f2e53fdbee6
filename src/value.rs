use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::LazyLock,
};

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::{
    error::{FilterError, Result},
    scanner::{read_quoted, write_quoted},
};

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").unwrap());
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<year>[0-9]{4})-(?<month>[0-9]{2})-(?<day>[0-9]{2})$").unwrap());

/// A typed value on the right-hand side of a comparison.
///
/// Integers and decimals are kept apart so that `30` and `30.0` render back
/// exactly as they were written, but they compare and hash by numeric value:
/// `30`, `30.0` and `30.00` are one value.
///
/// # Examples
///
/// ```
/// use sieve_filter::value::{coerce, Scalar, ValuePolicy};
///
/// assert_eq!(coerce("'Jacob'", ValuePolicy::Strict).unwrap(), Scalar::String("Jacob".into()));
/// assert_eq!(coerce("-42", ValuePolicy::Strict).unwrap(), Scalar::Integer(-42));
/// assert_eq!(coerce("true", ValuePolicy::Strict).unwrap(), Scalar::Boolean(true));
/// assert!(coerce("Jacob", ValuePolicy::Strict).is_err());
///
/// let thirty = coerce("30.0", ValuePolicy::Strict).unwrap();
/// assert_eq!(thirty.to_string(), "30.0");
/// assert_eq!(thirty, Scalar::Integer(30));
/// ```
#[derive(Debug, Clone)]
pub enum Scalar {
    /// Empty token or the `null` literal
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// Whole number, e.g. `30` or `-7`
    Integer(i64),

    /// Exact decimal, e.g. `19.99`
    Decimal(Decimal),

    /// Single-quoted literal, stored unescaped
    String(String),

    /// Calendar date written as `YYYY-MM-DD`
    Date(NaiveDate),
}

/// What to do with a token that matches none of the scalar forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Reject it with [`FilterError::InvalidValue`].
    #[default]
    Strict,
    /// Keep it as a bare string value.
    Lenient,
}

impl Scalar {
    /// Integers and decimals as one exact number.
    fn as_number(&self) -> Option<Decimal> {
        match self {
            Scalar::Integer(n) => Some(Decimal::from(*n)),
            Scalar::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Boolean(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Decimal(_) => "decimal",
            Scalar::String(_) => "string",
            Scalar::Date(_) => "date",
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a == b,
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Date(a), Scalar::Date(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Scalar::Null => 0u8.hash(state),
            Scalar::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            // Decimal hashes its normalized form, so 30 and 30.00 collide
            Scalar::Integer(_) | Scalar::Decimal(_) => {
                2u8.hash(state);
                self.as_number().hash(state);
            }
            Scalar::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Scalar::Date(date) => {
                4u8.hash(state);
                date.hash(state);
            }
        }
    }
}

/// Renders the literal as it appears in filter text.
///
/// Dates render as a quoted ISO-8601 instant at UTC midnight.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Decimal(d) => write!(f, "{}", d),
            Scalar::String(s) => write!(f, "{}", write_quoted(s)),
            Scalar::Date(date) => write!(f, "'{}T00:00:00.000Z'", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Integer(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(date: NaiveDate) -> Self {
        Scalar::Date(date)
    }
}

/// Convert a raw value token into a [`Scalar`].
///
/// Rules are tried in order: empty or `null`, quoted string, integer,
/// decimal, boolean, `YYYY-MM-DD` date. Anything else is handled according
/// to `policy`.
pub fn coerce(token: &str, policy: ValuePolicy) -> Result<Scalar> {
    let token = token.trim();

    if token.is_empty() || token == "null" {
        return Ok(Scalar::Null);
    }

    if token.starts_with('\'') {
        return read_quoted(token)
            .map(Scalar::String)
            .ok_or_else(|| FilterError::InvalidValue(token.to_string()));
    }

    if INTEGER.is_match(token) {
        // Out of i64 range: keep it exact as a decimal
        return match token.parse::<i64>() {
            Ok(n) => Ok(Scalar::Integer(n)),
            Err(_) => parse_decimal(token),
        };
    }

    if DECIMAL.is_match(token) {
        return parse_decimal(token);
    }

    match token {
        "true" => return Ok(Scalar::Boolean(true)),
        "false" => return Ok(Scalar::Boolean(false)),
        _ => {}
    }

    if let Some(caps) = DATE.captures(token) {
        let component = |name: &str| caps[name].parse::<u32>().unwrap_or(0);
        let year = component("year") as i32;
        return NaiveDate::from_ymd_opt(year, component("month"), component("day"))
            .map(Scalar::Date)
            .ok_or_else(|| FilterError::InvalidValue(token.to_string()));
    }

    match policy {
        ValuePolicy::Strict => Err(FilterError::InvalidValue(token.to_string())),
        ValuePolicy::Lenient => Ok(Scalar::String(token.to_string())),
    }
}

fn parse_decimal(token: &str) -> Result<Scalar> {
    Decimal::from_str(token)
        .map(Scalar::Decimal)
        .map_err(|_| FilterError::InvalidValue(token.to_string()))
}

#[test]
fn test_coerce_dates() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    assert_eq!(coerce("2024-01-15", ValuePolicy::Strict), Ok(Scalar::Date(date)));
    assert!(matches!(
        coerce("2024-02-30", ValuePolicy::Strict),
        Err(FilterError::InvalidValue(_))
    ));
}

#[test]
fn test_coerce_numbers() {
    assert_eq!(coerce("30", ValuePolicy::Strict), Ok(Scalar::Integer(30)));
    assert_eq!(
        coerce("19.99", ValuePolicy::Strict),
        Ok(Scalar::Decimal(Decimal::new(1999, 2)))
    );
    assert!(matches!(
        coerce("99999999999999999999", ValuePolicy::Strict),
        Ok(Scalar::Decimal(_))
    ));
}

#[test]
fn test_coerce_policy() {
    assert_eq!(
        coerce("Jacob", ValuePolicy::Strict),
        Err(FilterError::InvalidValue("Jacob".to_string()))
    );
    assert_eq!(coerce("Jacob", ValuePolicy::Lenient), Ok(Scalar::from("Jacob")));
    assert_eq!(coerce("", ValuePolicy::Strict), Ok(Scalar::Null));
    assert_eq!(coerce("null", ValuePolicy::Strict), Ok(Scalar::Null));
}

#[test]
fn test_unterminated_literal_is_invalid() {
    assert!(matches!(
        coerce("'Jacob", ValuePolicy::Lenient),
        Err(FilterError::InvalidValue(_))
    ));
}

#[test]
fn test_numbers_compare_by_value() {
    use std::collections::HashSet;

    let thirty = coerce("30", ValuePolicy::Strict).unwrap();
    let thirty_point_oh = coerce("30.0", ValuePolicy::Strict).unwrap();
    assert!(matches!(thirty_point_oh, Scalar::Decimal(_)));
    assert_eq!(thirty, thirty_point_oh);
    assert_ne!(thirty, Scalar::from("30"));

    let set: HashSet<Scalar> = ["30", "30.0", "30.00", "31"]
        .into_iter()
        .map(|token| coerce(token, ValuePolicy::Strict).unwrap())
        .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_display() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    assert_eq!(Scalar::Date(date).to_string(), "'2024-01-15T00:00:00.000Z'");
    assert_eq!(Scalar::from("O'Brien").to_string(), r"'O\'Brien'");
    assert_eq!(Scalar::Decimal(Decimal::new(1999, 2)).to_string(), "19.99");
}
