//! Regex tokenization and column alignment over a region of lines.
//!
//! Each line is split by the separator pattern into alternating parts:
//!
//! ```text
//! Text, Separator, Text, ..., Separator, Text
//! ```
//!
//! A `Block` is built once per pass, trimmed, aligned, and serialized back.

use regex::Regex;

use crate::config::TabSize;
use crate::line_ending::LineEnding;
use crate::metrics;
use crate::AlignError;

/// Classification of a line segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Text,
    Separator,
}

/// One segment of a tokenized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub kind: PartKind,
    pub value: String,
}

impl Part {
    pub fn text(value: &str) -> Self {
        Self {
            kind: PartKind::Text,
            value: value.to_string(),
        }
    }

    pub fn separator(value: &str) -> Self {
        Self {
            kind: PartKind::Separator,
            value: value.to_string(),
        }
    }
}

/// A tokenized source line.
///
/// `parts` always has odd length and starts and ends with a `Text` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Absolute line index in the source document.
    pub number: usize,
    pub parts: Vec<Part>,
}

impl Line {
    /// Tokenize `source` with `separator`.
    ///
    /// Tokenization stops at the first empty match; the rest of the line
    /// becomes the trailing `Text` part.
    pub fn tokenize(number: usize, source: &str, separator: &Regex) -> Self {
        let mut parts = Vec::new();
        let mut pos = 0;

        while let Some(m) = separator.find_at(source, pos) {
            if m.is_empty() {
                break;
            }
            parts.push(Part::text(&source[pos..m.start()]));
            parts.push(Part::separator(m.as_str()));
            pos = m.end();
        }
        parts.push(Part::text(&source[pos..]));

        Self { number, parts }
    }

    /// Whether the separator matched at least once on this line.
    pub fn has_separator(&self) -> bool {
        self.parts.len() > 1
    }

    /// Current line text, parts concatenated.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.value.as_str()).collect()
    }

    /// Normalize whitespace around separators to a single space.
    ///
    /// The first part keeps its indentation, text parts lose surrounding
    /// whitespace, and each separator is wrapped in one space per side. No
    /// space is emitted before a separator that starts the line or after
    /// one that ends it. Lines without a separator are left alone.
    fn trim(&mut self) {
        if !self.has_separator() {
            return;
        }

        let last = self.parts.len() - 1;
        let starts_bare = self.parts[0].value.trim().is_empty();
        let ends_bare = self.parts[last].value.trim().is_empty();

        for (i, part) in self.parts.iter_mut().enumerate() {
            part.value = match (part.kind, i) {
                (PartKind::Text, 0) if starts_bare => part.value.clone(),
                (PartKind::Text, 0) => part.value.trim_end().to_string(),
                (PartKind::Text, _) => part.value.trim().to_string(),
                // whitespace separator collapses to one space
                (PartKind::Separator, _) if part.value.trim().is_empty() => " ".to_string(),
                (PartKind::Separator, _) => {
                    let core = part.value.trim();
                    let lead = if i == 1 && starts_bare { "" } else { " " };
                    let trail = if i == last - 1 && ends_bare { "" } else { " " };
                    format!("{lead}{core}{trail}")
                }
            };
        }
    }
}

/// A region of tokenized lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    lines: Vec<Line>,
    start_line: usize,
    line_ending: LineEnding,
}

impl Block {
    /// Compile `pattern` and tokenize every line of `text`.
    pub fn new(
        text: &str,
        pattern: &str,
        start_line: usize,
        line_ending: LineEnding,
    ) -> Result<Self, AlignError> {
        let separator = Regex::new(pattern).map_err(|e| AlignError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::with_regex(text, &separator, start_line, line_ending))
    }

    /// Tokenize every line of `text` with an already compiled separator.
    pub fn with_regex(
        text: &str,
        separator: &Regex,
        start_line: usize,
        line_ending: LineEnding,
    ) -> Self {
        let lines = text
            .split(line_ending.as_str())
            .enumerate()
            .map(|(offset, source)| Line::tokenize(start_line + offset, source, separator))
            .collect();

        Self {
            lines,
            start_line,
            line_ending,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// First absolute line number covered by the block.
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// Last absolute line number covered by the block.
    pub fn end_line(&self) -> usize {
        self.start_line + self.lines.len().saturating_sub(1)
    }

    /// Collapse whitespace around every separator.
    pub fn trim(&mut self) -> &mut Self {
        for line in &mut self.lines {
            line.trim();
        }
        self
    }

    /// Pad parts into columns.
    ///
    /// Column widths are taken only from lines where the separator matched.
    /// The last part of each line is never padded.
    pub fn align(&mut self, tab_size: TabSize) -> &mut Self {
        let mut widths: Vec<usize> = Vec::new();
        for line in self.lines.iter().filter(|l| l.has_separator()) {
            for (i, part) in line.parts.iter().enumerate() {
                let w = metrics::width(&part.value, tab_size);
                match widths.get_mut(i) {
                    Some(max) => *max = (*max).max(w),
                    None => widths.push(w),
                }
            }
        }

        for line in &mut self.lines {
            let last = line.parts.len() - 1;
            for (i, part) in line.parts.iter_mut().enumerate().take(last) {
                part.value = metrics::pad(&part.value, widths[i], tab_size);
            }
        }
        self
    }

    /// Reassemble the region with its original line ending.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join(self.line_ending.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn values(line: &Line) -> Vec<&str> {
        line.parts.iter().map(|p| p.value.as_str()).collect()
    }

    fn aligned(text: &str, pattern: &str) -> String {
        let mut block = Block::new(text, pattern, 0, LineEnding::Lf).unwrap();
        block.trim().align(TabSize::new(4));
        block.to_text()
    }

    // =========================================================================
    // Tokenization
    // =========================================================================

    #[test]
    fn test_tokenize_alternates_parts() {
        let line = Line::tokenize(0, "a=b=c", &re("="));
        assert_eq!(values(&line), vec!["a", "=", "b", "=", "c"]);
        let kinds: Vec<_> = line.parts.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PartKind::Text,
                PartKind::Separator,
                PartKind::Text,
                PartKind::Separator,
                PartKind::Text,
            ]
        );
    }

    #[test]
    fn test_tokenize_leading_and_trailing_separator() {
        let line = Line::tokenize(0, "=a=", &re("="));
        assert_eq!(values(&line), vec!["", "=", "a", "=", ""]);
    }

    #[test]
    fn test_tokenize_no_match() {
        let line = Line::tokenize(3, "plain", &re(":"));
        assert_eq!(values(&line), vec!["plain"]);
        assert!(!line.has_separator());
        assert_eq!(line.number, 3);
    }

    #[test]
    fn test_tokenize_empty_match_terminates() {
        let line = Line::tokenize(0, "abc", &re("x*"));
        assert_eq!(values(&line), vec!["abc"]);
    }

    #[test]
    fn test_tokenize_optional_pattern_stops_at_first_position() {
        let line = Line::tokenize(0, "a:b", &re(":?"));
        // Empty match at offset 0, before the colon is reached.
        assert_eq!(values(&line), vec!["a:b"]);
    }

    #[test]
    fn test_tokenize_anchor_only_at_line_start() {
        let line = Line::tokenize(0, "aaa", &re("^a"));
        assert_eq!(values(&line), vec!["", "a", "aa"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Block::new("a", "(", 0, LineEnding::Lf).unwrap_err();
        assert!(matches!(err, AlignError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_line_numbers_are_absolute() {
        let block = Block::new("a\nb\nc", ":", 10, LineEnding::Lf).unwrap();
        let numbers: Vec<_> = block.lines().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![10, 11, 12]);
        assert_eq!(block.start_line(), 10);
        assert_eq!(block.end_line(), 12);
    }

    // =========================================================================
    // Trim
    // =========================================================================

    #[test]
    fn test_trim_collapses_whitespace() {
        let mut block = Block::new("  key   =    value  ", "=", 0, LineEnding::Lf).unwrap();
        block.trim();
        assert_eq!(values(&block.lines()[0]), vec!["  key", " = ", "value"]);
    }

    #[test]
    fn test_trim_independent_of_input_spacing() {
        let mut tight = Block::new("a=b", "=", 0, LineEnding::Lf).unwrap();
        let mut loose = Block::new("a \t=   b", "=", 0, LineEnding::Lf).unwrap();
        tight.trim();
        loose.trim();
        assert_eq!(tight.to_text(), "a = b");
        assert_eq!(loose.to_text(), "a = b");
    }

    #[test]
    fn test_trim_separator_at_line_edges() {
        let mut block = Block::new("= a =", "=", 0, LineEnding::Lf).unwrap();
        block.trim();
        assert_eq!(block.to_text(), "= a =");
    }

    #[test]
    fn test_trim_whitespace_separator_is_one_space() {
        assert_eq!(aligned("a b", r"\s+"), "a b");
        assert_eq!(aligned("a \t  b", r"\s+"), "a b");
    }

    #[test]
    fn test_trim_leaves_unmatched_line() {
        let mut block = Block::new("  spaced   out  ", "=", 0, LineEnding::Lf).unwrap();
        block.trim();
        assert_eq!(block.to_text(), "  spaced   out  ");
    }

    // =========================================================================
    // Align
    // =========================================================================

    #[test]
    fn test_align_pads_columns() {
        assert_eq!(aligned("a:1\nbb:2", ":"), "a  : 1\nbb : 2");
    }

    #[test]
    fn test_align_excludes_unmatched_lines() {
        let text = "a:1\nbb:2\nno-colon-here";
        let block = {
            let mut b = Block::new(text, ":", 0, LineEnding::Lf).unwrap();
            b.trim().align(TabSize::new(4));
            b
        };
        assert_eq!(block.to_text(), "a  : 1\nbb : 2\nno-colon-here");
        assert_eq!(values(&block.lines()[2]), vec!["no-colon-here"]);
    }

    #[test]
    fn test_align_last_part_ragged() {
        let out = aligned("x = 1\nyy = 22222", "=");
        assert_eq!(out, "x  = 1\nyy = 22222");
    }

    #[test]
    fn test_align_whitespace_columns() {
        assert_eq!(aligned("int x;\nlong yy;", r"\s+"), "int  x;\nlong yy;");
    }

    #[test]
    fn test_align_multiple_separators() {
        let out = aligned("a, b, c\nlong, x, y", ",");
        assert_eq!(out, "a    , b , c\nlong , x , y");
    }

    #[test]
    fn test_align_uses_tab_width() {
        let mut block = Block::new("\tx = 1\nabcdefgh = 2", "=", 0, LineEnding::Lf).unwrap();
        block.trim().align(TabSize::new(4));
        assert_eq!(block.to_text(), "\tx    = 1\nabcdefgh = 2");
    }

    #[test]
    fn test_align_idempotent() {
        let text = "let a = 1;\nlet long_name = 2;\nlet b   =    3;";
        let once = aligned(text, "=");
        let twice = aligned(&once, "=");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_align_preserves_crlf() {
        let mut block = Block::new("a:1\r\nbb:2", ":", 0, LineEnding::Crlf).unwrap();
        block.trim().align(TabSize::new(4));
        assert_eq!(block.to_text(), "a  : 1\r\nbb : 2");
    }
}
