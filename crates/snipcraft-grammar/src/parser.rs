//! Snippet definition parser.
//!
//! ```text
//! snippet := name scope? prefix body
//! name    := "//" sp "Name"   sp ":" sp value nl
//! scope   := "//" sp "Scope"  sp ":" sp value nl
//! prefix  := "//" sp "Prefix" sp ":" sp value nl
//! body    := sep .+
//! sep     := "//" sp "-"+ sp nl
//! value   := [^\r\n]+
//! sp      := [ \t]*             (reported as "whitespace")
//! nl      := ("\r\n" / "\n")+   (reported as "newline")
//! ```
//!
//! Recursive descent over a character cursor. Rules return `None` on
//! failure and restore the cursor; the furthest failure position and the
//! expectations recorded there are kept across backtracking and become the
//! `SyntaxError` when the top rule fails.

use std::collections::BTreeMap;

use crate::error::{Expectation, Location, Position, SyntaxError};
use crate::snippet::ParsedSnippet;

/// Snippet definition parser.
pub struct Parser {
    chars: Vec<char>,
    pos: usize,
    max_fail_pos: usize,
    max_fail_expected: Vec<Expectation>,
    silent: usize,
    line_cache: BTreeMap<usize, (usize, usize)>,
}

impl Parser {
    /// Create a new parser for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            max_fail_pos: 0,
            max_fail_expected: Vec::new(),
            silent: 0,
            line_cache: BTreeMap::from([(0, (1, 1))]),
        }
    }

    /// Parse a whole snippet definition.
    pub fn parse(source: &str) -> Result<ParsedSnippet, SyntaxError> {
        Parser::new(source).parse_snippet_document()
    }

    fn parse_snippet_document(&mut self) -> Result<ParsedSnippet, SyntaxError> {
        if let Some(snippet) = self.parse_snippet() {
            if self.is_at_end() {
                return Ok(snippet);
            }
            self.fail(Expectation::End);
        }
        Err(self.error())
    }

    // =========================================================================
    // Rules
    // =========================================================================

    fn parse_snippet(&mut self) -> Option<ParsedSnippet> {
        let start = self.pos;
        let parsed = (|| {
            let name = self.parse_field("Name")?;
            let scope = self.parse_field("Scope");
            let prefix = self.parse_field("Prefix")?;
            let body = self.parse_body()?;
            Some(ParsedSnippet {
                name,
                scope,
                prefix,
                body,
            })
        })();
        self.restore_on_failure(start, parsed)
    }

    /// `"//" sp <keyword> sp ":" sp value nl`
    fn parse_field(&mut self, keyword: &str) -> Option<String> {
        let start = self.pos;
        let parsed = (|| {
            self.expect_literal("//")?;
            self.skip_whitespace();
            self.expect_literal(keyword)?;
            self.skip_whitespace();
            self.expect_literal(":")?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            self.expect_newlines()?;
            Some(value)
        })();
        self.restore_on_failure(start, parsed)
    }

    /// `sep .+`
    fn parse_body(&mut self) -> Option<String> {
        let start = self.pos;
        let parsed = (|| {
            self.parse_separator()?;
            if self.is_at_end() {
                self.fail(Expectation::Any);
                return None;
            }
            let body: String = self.chars[self.pos..].iter().collect();
            self.pos = self.chars.len();
            Some(body)
        })();
        self.restore_on_failure(start, parsed)
    }

    /// `"//" sp "-"+ sp nl`
    fn parse_separator(&mut self) -> Option<()> {
        let start = self.pos;
        let parsed = (|| {
            self.expect_literal("//")?;
            self.skip_whitespace();
            self.expect_literal("-")?;
            while self.match_literal("-") {}
            self.skip_whitespace();
            self.expect_newlines()
        })();
        self.restore_on_failure(start, parsed)
    }

    /// `[^\r\n]+`
    fn parse_value(&mut self) -> Option<String> {
        let start = self.pos;
        while !self.is_at_end() && !matches!(self.peek(), '\r' | '\n') {
            self.pos += 1;
        }
        self.fail(Expectation::Class {
            chars: vec!['\r', '\n'],
            inverted: true,
        });
        (self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
    }

    /// `[ \t]*`, reported as one "whitespace" expectation.
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && matches!(self.peek(), ' ' | '\t') {
            self.pos += 1;
        }
        self.fail(Expectation::other("whitespace"));
    }

    /// `("\r\n" / "\n")+`, reported as one "newline" expectation.
    fn expect_newlines(&mut self) -> Option<()> {
        let start = self.pos;
        self.silent += 1;
        while self.match_literal("\r\n") || self.match_literal("\n") {}
        self.silent -= 1;
        self.fail(Expectation::other("newline"));
        (self.pos > start).then_some(())
    }

    // =========================================================================
    // Cursor helpers
    // =========================================================================

    fn match_literal(&mut self, literal: &str) -> bool {
        let len = literal.chars().count();
        let matched = self.pos + len <= self.chars.len()
            && self.chars[self.pos..self.pos + len]
                .iter()
                .copied()
                .eq(literal.chars());
        if matched {
            self.pos += len;
        } else {
            self.fail(Expectation::literal(literal));
        }
        matched
    }

    fn expect_literal(&mut self, literal: &str) -> Option<()> {
        self.match_literal(literal).then_some(())
    }

    fn restore_on_failure<T>(&mut self, start: usize, parsed: Option<T>) -> Option<T> {
        if parsed.is_none() {
            self.pos = start;
        }
        parsed
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    // =========================================================================
    // Failure tracking
    // =========================================================================

    /// Record `expected` at the current position unless a later position already failed.
    fn fail(&mut self, expected: Expectation) {
        if self.silent > 0 || self.pos < self.max_fail_pos {
            return;
        }
        if self.pos > self.max_fail_pos {
            self.max_fail_pos = self.pos;
            self.max_fail_expected.clear();
        }
        self.max_fail_expected.push(expected);
    }

    fn error(&mut self) -> SyntaxError {
        let at = self.max_fail_pos;
        let found = self.chars.get(at).copied();
        let end = if found.is_some() { at + 1 } else { at };
        let location = Location {
            start: self.position(at),
            end: self.position(end),
        };
        SyntaxError::new(std::mem::take(&mut self.max_fail_expected), found, location)
    }

    /// Line and column of `offset`, scanning forward from the nearest cached point.
    fn position(&mut self, offset: usize) -> Position {
        let (&from, &(mut line, mut column)) = self
            .line_cache
            .range(..=offset)
            .next_back()
            .unwrap_or((&0, &(1, 1)));

        for &c in &self.chars[from..offset] {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        self.line_cache.insert(offset, (line, column));

        Position {
            offset,
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ParsedSnippet {
        Parser::parse(source).unwrap()
    }

    fn parse_err(source: &str) -> SyntaxError {
        Parser::parse(source).unwrap_err()
    }

    // =========================================================================
    // Successful parses
    // =========================================================================

    #[test]
    fn test_full_snippet() {
        let snippet = parse(
            "// Name: greet\n// Scope: javascript\n// Prefix: hi\n// ----\nconsole.log(\"hi\");\n",
        );
        assert_eq!(
            snippet,
            ParsedSnippet {
                name: "greet".to_string(),
                scope: Some("javascript".to_string()),
                prefix: "hi".to_string(),
                body: "console.log(\"hi\");\n".to_string(),
            }
        );
    }

    #[test]
    fn test_scope_is_optional() {
        let snippet = parse("// Name: greet\n// Prefix: hi\n// ----\nconsole.log(\"hi\");");
        assert_eq!(snippet.scope, None);
        assert_eq!(snippet.prefix, "hi");
        assert_eq!(snippet.body, "console.log(\"hi\");");
    }

    #[test]
    fn test_flexible_whitespace() {
        let snippet = parse("//Name :\tgreet\n//\tPrefix:hi, hello\n//   ---   \nbody");
        assert_eq!(snippet.name, "greet");
        assert_eq!(snippet.prefix, "hi, hello");
        assert_eq!(snippet.body, "body");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let snippet = parse("// Name: greet\r\n\r\n// Prefix: hi\r\n// -\r\nline 1\r\nline 2");
        assert_eq!(snippet.name, "greet");
        assert_eq!(snippet.prefix, "hi");
        assert_eq!(snippet.body, "line 1\r\nline 2");
    }

    #[test]
    fn test_value_keeps_trailing_spaces() {
        let snippet = parse("// Name: greet  \n// Prefix: hi\n// -\nx");
        assert_eq!(snippet.name, "greet  ");
    }

    #[test]
    fn test_body_is_verbatim() {
        let body = "// Name: not a field\n\n  ${1:indent}\n// ----\n";
        let snippet = parse(&format!("// Name: n\n// Prefix: p\n// --\n{body}"));
        assert_eq!(snippet.body, body);
    }

    #[test]
    fn test_unicode_values() {
        let snippet = parse("// Name: café ☕\n// Prefix: ☕\n// -\n╔═╗");
        assert_eq!(snippet.name, "café ☕");
        assert_eq!(snippet.body, "╔═╗");
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_missing_name_reports_line_one() {
        let err = parse_err("hello\n// Prefix: hi\n// -\nx");
        assert_eq!(err.location.start.line, 1);
        assert_eq!(err.location.start.column, 1);
        assert_eq!(err.location.start.offset, 0);
        assert_eq!(err.location.end.column, 2);
        assert_eq!(err.expected, vec![Expectation::literal("//")]);
        assert_eq!(err.found, Some('h'));
        assert_eq!(err.message, "Expected \"//\" but \"h\" found.");
    }

    #[test]
    fn test_wrong_keyword_merges_expectations() {
        let err = parse_err("// Scope: js\n// Prefix: hi\n// -\nx");
        assert_eq!(err.location.start.column, 4);
        assert_eq!(err.message, "Expected \"Name\" or whitespace but \"S\" found.");
    }

    #[test]
    fn test_missing_prefix_after_scope() {
        let err = parse_err("// Name: n\n// Scope: s\n// -\nx");
        assert_eq!(err.location.start.line, 3);
        assert_eq!(err.location.start.column, 4);
        assert_eq!(
            err.message,
            "Expected \"Prefix\" or whitespace but \"-\" found."
        );
    }

    #[test]
    fn test_missing_prefix_without_scope() {
        let err = parse_err("// Name: n\n// -\nx");
        assert_eq!(err.location.start.line, 2);
        assert_eq!(err.location.start.column, 4);
        assert_eq!(
            err.message,
            "Expected \"Prefix\", \"Scope\", or whitespace but \"-\" found."
        );
    }

    #[test]
    fn test_empty_value() {
        let err = parse_err("// Name:\n// Prefix: p\n// -\nx");
        assert_eq!(err.location.start.offset, 8);
        assert_eq!(
            err.message,
            "Expected [^\\r\\n] or whitespace but \"\\n\" found."
        );
    }

    #[test]
    fn test_missing_body() {
        let err = parse_err("// Name: n\n// Prefix: p\n// ---\n");
        assert_eq!(err.found, None);
        assert_eq!(err.location.start.line, 4);
        assert_eq!(err.location.start.column, 1);
        assert_eq!(err.location.start, err.location.end);
        assert_eq!(
            err.message,
            "Expected any character or newline but end of input found."
        );
    }

    #[test]
    fn test_separator_needs_newline() {
        let err = parse_err("// Name: n\n// Prefix: p\n// --- body");
        assert_eq!(err.location.start.line, 3);
        assert_eq!(err.location.start.column, 8);
        assert_eq!(err.message, "Expected newline or whitespace but \"b\" found.");
    }

    #[test]
    fn test_empty_input() {
        let err = parse_err("");
        assert_eq!(err.found, None);
        assert_eq!(err.message, "Expected \"//\" but end of input found.");
    }

    #[test]
    fn test_position_cache_reuse() {
        let mut parser = Parser::new("ab\ncd\nef");
        assert_eq!(parser.position(7).line, 3);
        assert_eq!(parser.position(7).column, 2);
        let earlier = parser.position(4);
        assert_eq!((earlier.line, earlier.column), (2, 2));
        assert_eq!(parser.position(0).column, 1);
    }
}
