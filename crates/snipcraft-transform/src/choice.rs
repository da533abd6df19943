//! Choice tab-stop syntax and its inverse.
//!
//! A multi-line selection becomes one `${N|a,b,c|}` choice, with literal
//! commas escaped. A line followed by a `^^^` marker line is drawn as a
//! boxed header:
//!
//! ```text
//! Title        ${20|╔═══════╗,║ Title ║,╚═══════╝,item|}
//! ^^^     ─▶
//! item
//! ```
//!
//! Decoding a choice restores the lines, turning each box back into the
//! header line plus a `^^^` marker.

use once_cell::sync::Lazy;
use regex::Regex;
use snipcraft_text::LineEnding;

static CHOICE_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{\d+\|.+\|\}$").expect("choice pattern is valid"));

static CHOICE_DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{\d+\||\|\}$").expect("delimiter pattern is valid"));

// An element is a run of non-comma text where `\,` (any escaped pair) does not split.
static CHOICE_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)([^,\\]*(?:\\.[^,\\]*)*)(?:,|$)").expect("element pattern is valid")
});

static TOP_BORDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^╔═*╗$").expect("border pattern is valid"));

static BOTTOM_BORDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^╚═*╝$").expect("border pattern is valid"));

/// Line that turns the line above it into a header.
pub const HEADER_MARKER: &str = "^^^";

/// Whether `text` is a complete choice tab-stop, `${N|...|}`.
pub fn is_choice(text: &str) -> bool {
    CHOICE_SYNTAX.is_match(text)
}

/// Wrap `text` in choice syntax using tab-stop number `counter`.
///
/// Single-line text is wrapped verbatim; multi-line text becomes one
/// choice per line.
pub fn encode_choice(text: &str, counter: i64, multi_line: bool) -> String {
    if !multi_line {
        return format!("${{{counter}|{text}|}}");
    }

    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).replace(',', "\\,"))
        .collect();

    for i in 1..lines.len() {
        if is_marker(&lines[i]) {
            lines[i - 1] = header_box(&lines[i - 1]);
        }
    }
    lines.retain(|line| !is_marker(line));

    format!("${{{counter}|{}|}}", lines.join(","))
}

/// Restore the lines of a choice produced by [`encode_choice`].
///
/// Returns `None` when `text` is not choice syntax.
pub fn decode_choice(text: &str, line_ending: LineEnding) -> Option<String> {
    if !is_choice(text) {
        return None;
    }

    let inner = CHOICE_DELIMITERS.replace_all(text, "");
    let lines: Vec<String> = split_elements(&inner)
        .into_iter()
        .filter(|element| !TOP_BORDER.is_match(element))
        .map(|element| {
            if BOTTOM_BORDER.is_match(element) {
                return HEADER_MARKER.to_string();
            }
            let element = element.strip_prefix("║ ").unwrap_or(element);
            let element = element.strip_suffix(" ║").unwrap_or(element);
            element.replace("\\,", ",")
        })
        .collect();

    Some(lines.join(line_ending.as_str()))
}

/// Split a choice body on unescaped commas.
fn split_elements(inner: &str) -> Vec<&str> {
    CHOICE_ELEMENT
        .captures_iter(inner)
        .filter(|caps| {
            // An element must start on a character; this drops the empty
            // match at the very end.
            let start = caps.get(0).map_or(inner.len(), |m| m.start());
            inner[start..].chars().next().is_some_and(|c| c != '\n')
        })
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

fn is_marker(line: &str) -> bool {
    line.chars().count() >= 3 && line.chars().all(|c| c == '^')
}

/// Box `line` in a three-element header.
///
/// Escaped commas take two characters but draw as one, so they are
/// subtracted from the border width.
fn header_box(line: &str) -> String {
    let width = line.chars().count() - line.matches(',').count();
    let bar = "═".repeat(width);
    format!("╔═{bar}═╗,║ {line} ║,╚═{bar}═╝")
}
