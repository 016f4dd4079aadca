//! Nom-based message tokenizer.
//!
//! A token is a maximal run built from two kinds of segments glued together
//! without separators:
//!
//! - a bare segment: one or more characters that are neither whitespace nor `"`
//! - a quoted segment: `"` followed by anything except `"`, then a closing `"`
//!
//! ```text
//! !ban "John Doe" 10    ->  ["!ban", "John Doe", "10"]
//! say a"b c"d           ->  ["say", "ab cd"]
//! ```
//!
//! Every `"` inside an emitted token is removed. A `"` that is never closed
//! cannot start a segment and is skipped like whitespace.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::recognize,
    multi::many1_count,
    sequence::delimited,
    IResult,
};

/// The quote character that delimits tokens containing whitespace.
pub const QUOTE: char = '"';

/// Whitespace that separates tokens.
///
/// Deliberately the ASCII set only: vertical tab and Unicode spaces are
/// ordinary token characters.
#[inline]
pub const fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

fn bare_segment(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_separator(c) && c != QUOTE)(input)
}

fn quoted_segment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char(QUOTE),
        take_while(|c: char| c != QUOTE),
        char(QUOTE),
    ))(input)
}

/// Parse one raw token (quotes still present) at the start of `input`.
fn raw_token(input: &str) -> IResult<&str, &str> {
    recognize(many1_count(alt((bare_segment, quoted_segment))))(input)
}

fn strip_quotes(token: &str) -> String {
    if token.contains(QUOTE) {
        token.chars().filter(|&c| c != QUOTE).collect()
    } else {
        token.to_string()
    }
}

/// Split message text into tokens, left to right.
pub fn tokenize(text: &str) -> Vec<String> {
    raw_tokens(text).map(strip_quotes).collect()
}

/// Iterate the raw tokens of `text` without removing quote characters.
pub fn raw_tokens(text: &str) -> RawTokens<'_> {
    RawTokens { rest: text }
}

/// Iterator over raw tokens, see [`raw_tokens`].
#[derive(Debug, Clone)]
pub struct RawTokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for RawTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.rest.is_empty() {
            match raw_token(self.rest) {
                Ok((rest, token)) => {
                    self.rest = rest;
                    return Some(token);
                }
                Err(_) => {
                    // Separator or unterminated quote: skip one character.
                    let mut chars = self.rest.chars();
                    chars.next();
                    self.rest = chars.as_str();
                }
            }
        }
        None
    }
}
