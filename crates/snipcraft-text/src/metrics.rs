//! Column counting used by the alignment engine.
//!
//! A tab counts as the configured tab size, every other character as one
//! column. There is no grapheme or East Asian width handling; columns match
//! the editor's plain character counting.

use crate::config::TabSize;

/// Display width of `s`.
pub fn width(s: &str, tab_size: TabSize) -> usize {
    s.chars().fold(0usize, |total, c| {
        total.saturating_add(if c == '\t' { tab_size.get() } else { 1 })
    })
}

/// Append spaces to `s` until it is `target` columns wide. Never truncates.
pub fn pad(s: &str, target: usize, tab_size: TabSize) -> String {
    let fill = target.saturating_sub(width(s, tab_size));
    let mut out = String::with_capacity(s.len() + fill);
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(fill));
    out
}
