//! Structured syntax errors.
//!
//! An error lists every expectation that failed at the rightmost position
//! the parser reached, the character found there, and its location.

use serde::Serialize;

/// Something the parser was looking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expectation {
    Literal { text: String },
    Class { chars: Vec<char>, inverted: bool },
    Any,
    End,
    Other { description: String },
}

impl Expectation {
    pub fn literal(text: &str) -> Self {
        Self::Literal {
            text: text.to_string(),
        }
    }

    pub fn other(description: &str) -> Self {
        Self::Other {
            description: description.to_string(),
        }
    }

    /// Human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Literal { text } => format!("\"{}\"", escape_literal(text)),
            Self::Class { chars, inverted } => {
                let body: String = chars.iter().map(|c| escape_class(*c)).collect();
                format!("[{}{body}]", if *inverted { "^" } else { "" })
            }
            Self::Any => "any character".to_string(),
            Self::End => "end of input".to_string(),
            Self::Other { description } => description.clone(),
        }
    }
}

/// A point in the source. `line` and `column` are 1-based; `offset` counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

/// Snippet definition syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Syntax error at line {}, column {}: {message}", .location.start.line, .location.start.column)]
pub struct SyntaxError {
    pub message: String,
    pub expected: Vec<Expectation>,
    pub found: Option<char>,
    pub location: Location,
}

impl SyntaxError {
    pub fn new(expected: Vec<Expectation>, found: Option<char>, location: Location) -> Self {
        Self {
            message: build_message(&expected, found),
            expected,
            found,
            location,
        }
    }

    /// Render the error with the offending source line underlined.
    ///
    /// ```text
    /// Error: Expected "//" but "h" found.
    ///  --> snippet.txt:1:1
    ///   |
    /// 1 | hello
    ///   | ^
    /// ```
    pub fn format(&self, source_name: &str, source: &str) -> String {
        let start = self.location.start;
        let end = self.location.end;
        let here = format!("{source_name}:{}:{}", start.line, start.column);

        let Some(line) = split_lines(source).nth(start.line - 1) else {
            return format!("Error: {}\n at {here}", self.message);
        };

        let last = if start.line == end.line {
            end.column
        } else {
            line.chars().count() + 1
        };
        let gutter = " ".repeat(start.line.to_string().len());
        // empty at end of input or when the error sits on the line break
        let carets = "^".repeat(last.saturating_sub(start.column));

        format!(
            "Error: {}\n --> {here}\n{gutter} |\n{} | {line}\n{gutter} | {}{carets}",
            self.message,
            start.line,
            " ".repeat(start.column - 1),
        )
    }
}

fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// `Expected A, B, or C but "x" found.`
fn build_message(expected: &[Expectation], found: Option<char>) -> String {
    let mut descriptions: Vec<String> = expected.iter().map(Expectation::describe).collect();
    descriptions.sort();
    descriptions.dedup();

    let expected = match descriptions.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
    };
    let found = match found {
        Some(c) => format!("\"{}\"", escape_literal(&c.to_string())),
        None => "end of input".to_string(),
    };
    format!("Expected {expected} but {found} found.")
}

fn escape_control(c: char) -> Option<String> {
    let code = c as u32;
    match c {
        '\0' => Some("\\0".to_string()),
        '\t' => Some("\\t".to_string()),
        '\n' => Some("\\n".to_string()),
        '\r' => Some("\\r".to_string()),
        _ if code <= 0x1F || (0x7F..=0x9F).contains(&code) => Some(format!("\\x{code:02X}")),
        _ => None,
    }
}

fn escape_literal(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\\' => "\\\\".to_string(),
            '"' => "\\\"".to_string(),
            _ => escape_control(c).unwrap_or_else(|| c.to_string()),
        })
        .collect()
}

fn escape_class(c: char) -> String {
    match c {
        '\\' | ']' | '^' | '-' => format!("\\{c}"),
        _ => escape_control(c).unwrap_or_else(|| c.to_string()),
    }
}
