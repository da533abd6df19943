//! Replacement templates with `$` references.
//!
//! | token | expands to |
//! |-------|------------|
//! | `$$` | a literal `$` |
//! | `$&` | the whole match |
//! | `` $` `` | text before the match |
//! | `$'` | text after the match |
//! | `$n`, `$nn` | capture group `n` (1-99) when the pattern has it |
//! | `$<name>` | named group `name` |
//!
//! References to groups the pattern does not define are kept literally.

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
    Named(String),
    Match,
    Before,
    After,
}

/// A replacement template resolved against one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse `source` for use with `pattern`.
    pub fn parse(source: &str, pattern: &Regex) -> Self {
        let group_count = pattern.captures_len() - 1;
        let has_names = pattern.capture_names().flatten().next().is_some();

        let chars: Vec<char> = source.chars().collect();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut pos = 0;

        while pos < chars.len() {
            if chars[pos] != '$' || pos + 1 >= chars.len() {
                literal.push(chars[pos]);
                pos += 1;
                continue;
            }

            let (piece, consumed) = match chars[pos + 1] {
                '$' => (Piece::Literal("$".to_string()), 2),
                '&' => (Piece::Match, 2),
                '`' => (Piece::Before, 2),
                '\'' => (Piece::After, 2),
                d if d.is_ascii_digit() => match group_reference(&chars[pos + 1..], group_count) {
                    Some((index, digits)) => (Piece::Group(index), 1 + digits),
                    None => (Piece::Literal("$".to_string()), 1),
                },
                '<' if has_names => match chars[pos + 2..].iter().position(|&c| c == '>') {
                    Some(len) => {
                        let name: String = chars[pos + 2..pos + 2 + len].iter().collect();
                        (Piece::Named(name), 3 + len)
                    }
                    None => (Piece::Literal("$".to_string()), 1),
                },
                _ => (Piece::Literal("$".to_string()), 1),
            };

            match piece {
                Piece::Literal(text) => literal.push_str(&text),
                piece => {
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(piece);
                }
            }
            pos += consumed;
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Self { pieces }
    }

    /// Render the template for one match of the pattern over `haystack`.
    pub fn expand(&self, caps: &Captures<'_>, haystack: &str) -> String {
        let whole = caps.get(0);
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Group(index) => out.push_str(caps.get(*index).map_or("", |m| m.as_str())),
                Piece::Named(name) => out.push_str(caps.name(name).map_or("", |m| m.as_str())),
                Piece::Match => out.push_str(whole.map_or("", |m| m.as_str())),
                Piece::Before => out.push_str(whole.map_or("", |m| &haystack[..m.start()])),
                Piece::After => out.push_str(whole.map_or("", |m| &haystack[m.end()..])),
            }
        }
        out
    }
}

/// Resolve `$n` / `$nn` digits; prefers two digits when that group exists.
fn group_reference(digits: &[char], group_count: usize) -> Option<(usize, usize)> {
    let first = digits.first()?.to_digit(10)? as usize;
    if let Some(second) = digits.get(1).and_then(|c| c.to_digit(10)) {
        let both = first * 10 + second as usize;
        if (1..=group_count).contains(&both) {
            return Some((both, 2));
        }
    }
    (1..=group_count).contains(&first).then_some((first, 1))
}
