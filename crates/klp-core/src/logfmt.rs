//! Logfmt tokenizer and encoder.
//!
//! One line is one record: a sequence of `key=value` pairs separated by
//! whitespace. Values are either bare (running to the next whitespace) or
//! double-quoted with backslash escapes. A key with no `=` has an empty value.
//!
//! ```text
//! time=2024-01-15T10:00:00Z level=info msg="Server started" debug
//! ```

use std::borrow::Cow;

use crate::error::LogfmtError;

/// A single `key=value` pair, in the order it appeared on the line.
pub type Pair = (String, String);

/// Tokenize one line into its key/value pairs.
pub fn parse_line(line: &str) -> Result<Vec<Pair>, LogfmtError> {
    let chars: Vec<char> = line.chars().collect();
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }

        let key_start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' {
            if chars[i] == '"' {
                return Err(LogfmtError::UnexpectedQuote { column: i + 1 });
            }
            i += 1;
        }
        if i == key_start {
            return Err(LogfmtError::MissingKey { column: i + 1 });
        }
        let key: String = chars[key_start..i].iter().collect();

        if i == chars.len() || chars[i].is_whitespace() {
            pairs.push((key, String::new()));
            continue;
        }

        // Skip the '='.
        i += 1;
        let value = if chars.get(i) == Some(&'"') {
            let (value, next) = quoted_value(&chars, i)?;
            if next < chars.len() && !chars[next].is_whitespace() {
                return Err(LogfmtError::UnexpectedQuote { column: next + 1 });
            }
            i = next;
            value
        } else {
            let value_start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                if chars[i] == '"' {
                    return Err(LogfmtError::UnexpectedQuote { column: i + 1 });
                }
                i += 1;
            }
            chars[value_start..i].iter().collect()
        };
        pairs.push((key, value));
    }

    Ok(pairs)
}

/// Decode a quoted value whose opening quote sits at `open`. Returns the
/// unescaped value and the index just past the closing quote.
fn quoted_value(chars: &[char], open: usize) -> Result<(String, usize), LogfmtError> {
    let unterminated = LogfmtError::UnterminatedQuote { column: open + 1 };
    let mut value = String::new();
    let mut i = open + 1;

    while i < chars.len() {
        match chars[i] {
            '"' => return Ok((value, i + 1)),
            '\\' => {
                let escaped = *chars.get(i + 1).ok_or(unterminated.clone())?;
                let decoded = match escaped {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'u' => {
                        let invalid = LogfmtError::InvalidEscape { column: i + 1 };
                        let hex: String = chars
                            .get(i + 2..i + 6)
                            .ok_or(invalid.clone())?
                            .iter()
                            .collect();
                        let code = u32::from_str_radix(&hex, 16).map_err(|_| invalid.clone())?;
                        value.push(char::from_u32(code).ok_or(invalid)?);
                        i += 6;
                        continue;
                    }
                    _ => return Err(LogfmtError::InvalidEscape { column: i + 1 }),
                };
                value.push(decoded);
                i += 2;
            }
            c => {
                value.push(c);
                i += 1;
            }
        }
    }

    Err(unterminated)
}

/// Tokenize every non-blank line of `buffer`, yielding the 1-based physical
/// line number alongside each result.
pub fn records(buffer: &str) -> impl Iterator<Item = (u64, Result<Vec<Pair>, LogfmtError>)> + '_ {
    buffer
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index as u64 + 1, parse_line(line)))
}

/// Render a value so that [`parse_line`] reads it back unchanged, quoting
/// only when needed.
pub fn encode_value(value: &str) -> Cow<'_, str> {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=' || c == '\\');
    if !needs_quotes {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
