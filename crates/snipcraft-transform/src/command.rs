//! Commands as the editor invokes them.
//!
//! The host hands over the active selection (if any) and applies the
//! returned [`Outcome`]. Missing or empty input yields a [`Notice`] rather
//! than an error.

use std::fmt;

use snipcraft_text::{align_text, changed_lines, LineEdit, LineEnding, TabSize};

use crate::choice::{decode_choice, encode_choice};
use crate::state::{CounterBackend, CounterState, OperationStore};
use crate::tabstop::{escape_snippet_syntax, tab_stop};
use crate::TransformError;

/// The text a command operates on, as reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    /// Absolute line of the first selected line.
    pub start_line: usize,
    pub is_single_line: bool,
    pub line_ending: LineEnding,
}

impl Selection {
    pub fn new(text: impl Into<String>, start_line: usize, line_ending: LineEnding) -> Self {
        let text = text.into();
        let is_single_line = !text.contains('\n');
        Self {
            text,
            start_line,
            is_single_line,
            line_ending,
        }
    }
}

/// Informational result when there is nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoActiveSelection,
    EmptyInput,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveSelection => write!(f, "No active selection"),
            Self::EmptyInput => write!(f, "Nothing to transform"),
        }
    }
}

/// What the host should write back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Replace the selection.
    Replace(String),
    /// Replace individual lines by absolute line number.
    ReplaceLines(Vec<LineEdit>),
    /// Replace the whole document.
    ReplaceDocument(String),
    Notice(Notice),
}

fn non_empty(selection: Option<&Selection>) -> Result<&Selection, Notice> {
    match selection {
        None => Err(Notice::NoActiveSelection),
        Some(sel) if sel.text.is_empty() => Err(Notice::EmptyInput),
        Some(sel) => Ok(sel),
    }
}

/// Align the selected lines with one or more chained patterns.
pub fn align_selection(
    selection: Option<&Selection>,
    patterns: &str,
    tab_size: TabSize,
) -> Result<Outcome, TransformError> {
    let sel = match non_empty(selection) {
        Ok(sel) => sel,
        Err(notice) => return Ok(Outcome::Notice(notice)),
    };
    if patterns.trim().is_empty() {
        return Ok(Outcome::Notice(Notice::EmptyInput));
    }

    let aligned = align_text(&sel.text, patterns, sel.start_line, sel.line_ending, tab_size)?;
    Ok(Outcome::ReplaceLines(changed_lines(
        &sel.text,
        &aligned,
        sel.start_line,
        sel.line_ending,
    )))
}

/// Toggle choice syntax: decode a choice tab-stop, otherwise build one.
///
/// The counter only advances when a new choice is built.
pub fn toggle_choice(
    selection: Option<&Selection>,
    counter: &mut impl CounterBackend,
    newline: LineEnding,
) -> Outcome {
    let sel = match non_empty(selection) {
        Ok(sel) => sel,
        Err(notice) => return Outcome::Notice(notice),
    };

    if let Some(lines) = decode_choice(&sel.text, newline) {
        return Outcome::Replace(lines);
    }

    let n = CounterState::advance(counter);
    Outcome::Replace(encode_choice(&sel.text, n, !sel.is_single_line))
}

/// Replace the selection with a plain `${N:text}` tab-stop.
pub fn insert_tab_stop(
    selection: Option<&Selection>,
    counter: &mut impl CounterBackend,
) -> Outcome {
    match selection {
        None => Outcome::Notice(Notice::NoActiveSelection),
        Some(sel) => Outcome::Replace(tab_stop(&sel.text, CounterState::advance(counter))),
    }
}

/// Reset the tab-stop counter so the next tab-stop is number 10.
pub fn reset_counter(counter: &mut impl CounterBackend) {
    CounterState::reset().save(counter);
}

/// Escape snippet syntax in the selection, or in `document` when nothing is selected.
pub fn escape_selection(selection: Option<&Selection>, document: &str) -> Outcome {
    match selection {
        Some(sel) if !sel.text.is_empty() => Outcome::Replace(escape_snippet_syntax(&sel.text)),
        _ if document.is_empty() => Outcome::Notice(Notice::EmptyInput),
        _ => Outcome::ReplaceDocument(escape_snippet_syntax(document)),
    }
}

/// Run the saved operation `name` over the selection.
pub fn run_operation(
    store: &OperationStore,
    name: &str,
    selection: Option<&Selection>,
) -> Result<Outcome, TransformError> {
    let operation = store
        .get(name)
        .ok_or_else(|| TransformError::UnknownOperation(name.to_string()))?;
    let sel = match non_empty(selection) {
        Ok(sel) => sel,
        Err(notice) => return Ok(Outcome::Notice(notice)),
    };
    Ok(Outcome::Replace(operation.apply(&sel.text)?))
}
