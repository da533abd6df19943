//! Multi-pass alignment.
//!
//! A pattern string may hold several separator patterns joined by `{]` or
//! `[}`. Each pass tokenizes the output of the previous one.

use regex::Regex;

use crate::block::Block;
use crate::config::TabSize;
use crate::line_ending::LineEnding;
use crate::AlignError;

/// Delimiters between chained alignment patterns.
pub const PASS_DELIMITERS: [&str; 2] = ["{]", "[}"];

/// A line whose text changed after alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    pub line_number: usize,
    pub text: String,
}

/// Split a chained pattern string into its passes, skipping blank segments.
pub fn split_passes(patterns: &str) -> Vec<&str> {
    let mut passes = vec![patterns];
    for delimiter in PASS_DELIMITERS {
        passes = passes
            .into_iter()
            .flat_map(|segment| segment.split(delimiter))
            .collect();
    }
    passes.retain(|segment| !segment.trim().is_empty());
    passes
}

/// Align `text` with every pass in `patterns`.
///
/// All patterns are compiled before the first pass runs, so an invalid
/// pattern anywhere in the chain leaves the text untouched.
pub fn align_text(
    text: &str,
    patterns: &str,
    start_line: usize,
    line_ending: LineEnding,
    tab_size: TabSize,
) -> Result<String, AlignError> {
    let separators = split_passes(patterns)
        .into_iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| AlignError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut current = text.to_string();
    for (pass, separator) in separators.iter().enumerate() {
        log::debug!("alignment pass {pass} with /{}/", separator.as_str());
        let mut block = Block::with_regex(&current, separator, start_line, line_ending);
        block.trim().align(tab_size);
        current = block.to_text();
    }
    Ok(current)
}

/// Lines that differ between `original` and `aligned`, numbered from `start_line`.
pub fn changed_lines(
    original: &str,
    aligned: &str,
    start_line: usize,
    line_ending: LineEnding,
) -> Vec<LineEdit> {
    let eol = line_ending.as_str();
    original
        .split(eol)
        .zip(aligned.split(eol))
        .enumerate()
        .filter(|(_, (before, after))| before != after)
        .map(|(offset, (_, after))| LineEdit {
            line_number: start_line + offset,
            text: after.to_string(),
        })
        .collect()
}
