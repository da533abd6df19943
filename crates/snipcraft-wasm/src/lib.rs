//! WASM bindings for the snipcraft engines.
//!
//! The editor extension owns the document, the selection and the settings
//! store. Every function here takes plain strings and numbers and returns
//! the text to write back; counters go in and come out explicitly.

use serde::Serialize;
use snipcraft_text::{LineEdit, LineEnding, TabSize};
use snipcraft_transform::state::COUNTER_KEY;
use snipcraft_transform::{
    command, CounterBackend, MemoryStore, Notice, Outcome, ReplaceStep, Selection,
};
use wasm_bindgen::prelude::*;

/// Result of a command that consumes a tab-stop number.
///
/// `text` is `None` when there was nothing to transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Numbered {
    pub text: Option<String>,
    pub counter: i64,
}

/// Result of an alignment: the changed lines, or why nothing was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Aligned {
    edits: Vec<LineEdit>,
    notice: Option<Notice>,
}

fn line_ending(eol: &str) -> LineEnding {
    if eol == "\r\n" {
        LineEnding::Crlf
    } else {
        LineEnding::Lf
    }
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

// =============================================================================
// Native pipeline
// =============================================================================

fn native_align(
    text: &str,
    patterns: &str,
    start_line: usize,
    eol: LineEnding,
    tab_size: Option<i64>,
) -> Result<Aligned, snipcraft_transform::TransformError> {
    let selection = Selection::new(text, start_line, eol);
    let tab_size = TabSize::resolve(tab_size);
    let (edits, notice) = match command::align_selection(Some(&selection), patterns, tab_size)? {
        Outcome::ReplaceLines(edits) => (edits, None),
        Outcome::Notice(notice) => (Vec::new(), Some(notice)),
        Outcome::Replace(_) | Outcome::ReplaceDocument(_) => (Vec::new(), None),
    };
    Ok(Aligned { edits, notice })
}

fn numbered(counter: i64, run: impl FnOnce(&mut MemoryStore) -> Outcome) -> Numbered {
    let mut store = MemoryStore::default();
    store.set(COUNTER_KEY, counter);
    let text = match run(&mut store) {
        Outcome::Replace(text) => Some(text),
        _ => None,
    };
    Numbered {
        text,
        counter: store.get(COUNTER_KEY, counter),
    }
}

fn native_toggle_choice(text: &str, counter: i64, eol: LineEnding) -> Numbered {
    let selection = Selection::new(text, 0, eol);
    numbered(counter, |store| command::toggle_choice(Some(&selection), store, eol))
}

fn native_tab_stop(text: &str, counter: i64) -> Numbered {
    let selection = Selection::new(text, 0, LineEnding::Lf);
    numbered(counter, |store| command::insert_tab_stop(Some(&selection), store))
}

// =============================================================================
// Bindings
// =============================================================================

/// Align `text`. Returns `{ edits: [{ line, text }], notice }`.
///
/// `start_line` is the absolute line of the first selected line. `notice`
/// is a message when the selection or the patterns were empty, else `null`.
#[wasm_bindgen]
pub fn align(
    text: &str,
    patterns: &str,
    start_line: u32,
    eol: &str,
    tab_size: Option<i32>,
) -> Result<JsValue, JsError> {
    let aligned = native_align(
        text,
        patterns,
        start_line as usize,
        line_ending(eol),
        tab_size.map(i64::from),
    )
    .map_err(js_error)?;

    let array = js_sys::Array::new();
    for edit in aligned.edits {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"line".into(), &(edit.line_number as u32).into())
            .map_err(|_| JsError::new("Failed to set line property"))?;
        js_sys::Reflect::set(&obj, &"text".into(), &edit.text.into())
            .map_err(|_| JsError::new("Failed to set text property"))?;
        array.push(&obj);
    }

    let notice = match aligned.notice {
        Some(notice) => JsValue::from_str(&notice.to_string()),
        None => JsValue::NULL,
    };
    let result = js_sys::Object::new();
    js_sys::Reflect::set(&result, &"edits".into(), &array)
        .map_err(|_| JsError::new("Failed to set edits property"))?;
    js_sys::Reflect::set(&result, &"notice".into(), &notice)
        .map_err(|_| JsError::new("Failed to set notice property"))?;
    Ok(result.into())
}

/// Toggle choice syntax. Returns `{ text, counter }` with the counter to store.
#[wasm_bindgen(js_name = toggleChoice)]
pub fn toggle_choice(text: &str, counter: i32, eol: &str) -> Result<JsValue, JsError> {
    let result = native_toggle_choice(text, i64::from(counter), line_ending(eol));
    serde_wasm_bindgen::to_value(&result).map_err(js_error)
}

/// Wrap `text` in a plain tab-stop. Returns `{ text, counter }`.
#[wasm_bindgen(js_name = tabStop)]
pub fn tab_stop(text: &str, counter: i32) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&native_tab_stop(text, i64::from(counter))).map_err(js_error)
}

/// Escape `$`, `\` and `}`.
#[wasm_bindgen]
pub fn escape(text: &str) -> String {
    snipcraft_transform::escape_snippet_syntax(text)
}

/// Run `[{ find, replace }]` steps over `text`.
#[wasm_bindgen]
pub fn replace(text: &str, steps: JsValue) -> Result<String, JsError> {
    let steps: Vec<ReplaceStep> = serde_wasm_bindgen::from_value(steps).map_err(js_error)?;
    snipcraft_transform::apply_steps(&steps, text).map_err(js_error)
}

/// Parse a snippet definition.
///
/// Throws the structured syntax error (`message`, `expected`, `found`,
/// `location`) so the host can point at the failing line.
#[wasm_bindgen(js_name = parseSnippet)]
pub fn parse_snippet(source: &str) -> Result<JsValue, JsValue> {
    match snipcraft_grammar::parse(source) {
        Ok(snippet) => Ok(serde_wasm_bindgen::to_value(&snippet)?),
        Err(err) => Err(serde_wasm_bindgen::to_value(&err)?),
    }
}

/// Build the snippet file for a definition. Returns `{ fileName, content }`.
#[wasm_bindgen(js_name = snippetFile)]
pub fn snippet_file(source: &str, eol: &str) -> Result<JsValue, JsError> {
    let file = snipcraft_export::export(source, line_ending(eol)).map_err(js_error)?;

    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"fileName".into(), &file.file_name.into())
        .map_err(|_| JsError::new("Failed to set fileName property"))?;
    js_sys::Reflect::set(&obj, &"content".into(), &file.content.into())
        .map_err(|_| JsError::new("Failed to set content property"))?;
    Ok(obj.into())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
