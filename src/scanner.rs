use std::str::CharIndices;

/// Quoting state of the scanner at a given character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Outside any string literal.
    Normal,
    /// Inside a single-quoted literal.
    InQuote,
    /// Inside a literal, directly after a backslash.
    Escaped,
}

/// A character together with the state it was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    /// Byte offset into the scanned input
    pub offset: usize,
    pub ch: char,
    pub state: ScanState,
}

impl Scanned {
    /// True for characters that carry syntax: read outside a literal and not a quote.
    pub fn is_structural(&self) -> bool {
        self.state == ScanState::Normal && self.ch != '\''
    }
}

/// Single left-to-right pass over a fragment, tracking string literals.
///
/// Single quotes open and close literals; inside a literal a backslash
/// escapes the following character, so `\'` never closes it.
pub struct Scanner<'a> {
    chars: CharIndices<'a>,
    state: ScanState,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner {
            chars: input.char_indices(),
            state: ScanState::Normal,
        }
    }

    fn transition(&self, ch: char) -> ScanState {
        match (self.state, ch) {
            (ScanState::Normal, '\'') => ScanState::InQuote,
            (ScanState::Normal, _) => ScanState::Normal,
            (ScanState::InQuote, '\'') => ScanState::Normal,
            (ScanState::InQuote, '\\') => ScanState::Escaped,
            (ScanState::InQuote, _) => ScanState::InQuote,
            (ScanState::Escaped, _) => ScanState::InQuote,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let (offset, ch) = self.chars.next()?;
        let scanned = Scanned {
            offset,
            ch,
            state: self.state,
        };
        self.state = self.transition(ch);
        Some(scanned)
    }
}

/// Find the first separator, out of `separators`, that starts outside a literal.
///
/// Returns its byte offset and the separator that matched. When several
/// separators start at the same offset the earliest in `separators` wins.
pub fn find_separator<'s>(input: &str, separators: &[&'s str]) -> Option<(usize, &'s str)> {
    Scanner::new(input)
        .filter(Scanned::is_structural)
        .find_map(|scanned| {
            let rest = &input[scanned.offset..];
            separators
                .iter()
                .find(|sep| rest.starts_with(**sep))
                .map(|sep| (scanned.offset, *sep))
        })
}

/// Split on `delimiter` wherever it appears outside a literal.
pub fn split_outside_quotes(input: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for scanned in Scanner::new(input) {
        if scanned.is_structural() && scanned.ch == delimiter {
            parts.push(&input[start..scanned.offset]);
            start = scanned.offset + delimiter.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Decode a complete single-quoted literal such as `'O\'Brien'`.
///
/// Returns `None` unless the token is exactly one literal: it opens at the
/// first character and its closing quote is the last character.
pub fn read_quoted(token: &str) -> Option<String> {
    if !token.starts_with('\'') || token.len() < 2 {
        return None;
    }

    let mut scanner = Scanner::new(token);
    scanner.next();

    let mut result = String::new();
    while let Some(scanned) = scanner.next() {
        match scanned.state {
            ScanState::InQuote if scanned.ch == '\'' => {
                return match scanner.next() {
                    None => Some(result),
                    Some(_) => None,
                };
            }
            ScanState::InQuote if scanned.ch == '\\' => {}
            ScanState::Escaped => match scanned.ch {
                '\'' | '\\' => result.push(scanned.ch),
                ch => {
                    result.push('\\');
                    result.push(ch);
                }
            },
            _ => result.push(scanned.ch),
        }
    }

    // Unterminated literal
    None
}

/// Render `value` as a single-quoted literal that `read_quoted` decodes back.
///
/// A backslash is only escaped where it would otherwise start an escape:
/// before a quote, another backslash, or the closing quote. `C:\temp` is
/// written as `'C:\temp'`, not `'C:\\temp'`.
pub fn write_quoted(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 2);
    result.push('\'');

    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        let escape = match ch {
            '\'' => true,
            '\\' => matches!(chars.peek(), None | Some('\'' | '\\')),
            _ => false,
        };
        if escape {
            result.push('\\');
        }
        result.push(ch);
    }

    result.push('\'');
    result
}

#[test]
fn test_separator_skips_literals() {
    let input = "title eq 'Alex and Pat' or Age eq 3";
    assert_eq!(find_separator(input, &[" and ", " or "]), Some((23, " or ")));
}

#[test]
fn test_separator_first_position_wins() {
    let input = "A eq 1 or B eq 2 and C eq 3";
    assert_eq!(find_separator(input, &[" and ", " or "]), Some((6, " or ")));
}

#[test]
fn test_escaped_quote_stays_in_literal() {
    let input = r"Name eq 'O\'Brien and co' and Age eq 3";
    let (offset, sep) = find_separator(input, &[" and ", " or "]).unwrap();
    assert_eq!(sep, " and ");
    assert_eq!(&input[..offset], r"Name eq 'O\'Brien and co'");
}

#[test]
fn test_split_outside_quotes() {
    assert_eq!(
        split_outside_quotes("'a, b', 'c',3", ','),
        vec!["'a, b'", " 'c'", "3"]
    );
}

#[test]
fn test_read_quoted() {
    assert_eq!(read_quoted("'Jacob'"), Some("Jacob".to_string()));
    assert_eq!(read_quoted(r"'O\'Brien'"), Some("O'Brien".to_string()));
    assert_eq!(read_quoted(r"'C:\\temp'"), Some(r"C:\temp".to_string()));
    assert_eq!(read_quoted("''"), Some(String::new()));
    assert_eq!(read_quoted("'a' or 'b'"), None);
    assert_eq!(read_quoted(r"'open\'"), None);
    assert_eq!(read_quoted("'"), None);
}

#[test]
fn test_write_quoted_round_trip() {
    for value in ["plain", "O'Brien", r"back\slash", r"a\\b", r"trailing\", r"\'", ""] {
        assert_eq!(read_quoted(&write_quoted(value)).as_deref(), Some(value));
    }
}

#[test]
fn test_unknown_escape_is_written_back_unchanged() {
    for literal in [r"'C:\temp'", r"'a\nb'", r"'O\'Brien'", r"'end\\'"] {
        let decoded = read_quoted(literal).unwrap();
        assert_eq!(write_quoted(&decoded), literal);
    }
    assert_eq!(write_quoted(r"C:\temp"), r"'C:\temp'");
}
