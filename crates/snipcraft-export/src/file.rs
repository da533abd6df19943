//! Snippet file name and content.
//!
//! The content is a pretty-printed JSON snippet object, two line breaks,
//! and the definition source kept as `// ` comments:
//!
//! ```text
//! {
//!     "greet": {
//!         "scope": "javascript",
//!         "prefix": [
//!             "hi"
//!         ],
//!         "body": [
//!             "console.log(\"hi\");"
//!         ],
//!         "description": "greet"
//!     }
//! }
//!
//! // // Name: greet
//! // ...
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use snipcraft_grammar::ParsedSnippet;
use snipcraft_text::LineEnding;

use crate::ExportError;

static INVALID_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\?%*:|"<>]"#).expect("file name pattern is valid"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

static PREFIX_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("prefix pattern is valid"));

const JSON_INDENT: &[u8] = b"    ";

/// A snippet file ready to be written by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetFile {
    pub file_name: String,
    pub content: String,
}

impl SnippetFile {
    /// Build the file for `snippet`, parsed from `source`.
    pub fn new(
        snippet: &ParsedSnippet,
        source: &str,
        newline: LineEnding,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: file_name(snippet),
            content: content(snippet, source, newline)?,
        })
    }
}

#[derive(Serialize)]
struct SnippetEntry<'a> {
    scope: &'a str,
    prefix: Vec<&'a str>,
    body: [&'a str; 1],
    description: &'a str,
}

/// `[<prefix> - <name>].code-snippets`, prefixed with `<scope>.` when scoped.
///
/// Characters invalid in file names are removed and whitespace runs collapse
/// to a single space.
pub fn file_name(snippet: &ParsedSnippet) -> String {
    let mut name = format!("[{} - {}].code-snippets", snippet.prefix, snippet.name);
    if let Some(scope) = snippet.scope.as_deref().filter(|s| !s.is_empty()) {
        name = format!("{scope}.{name}");
    }
    let name = INVALID_FILE_CHARS.replace_all(&name, "");
    WHITESPACE_RUN.replace_all(&name, " ").into_owned()
}

/// The snippet JSON followed by the commented definition source.
pub fn content(
    snippet: &ParsedSnippet,
    source: &str,
    newline: LineEnding,
) -> Result<String, ExportError> {
    let entry = SnippetEntry {
        scope: snippet.scope.as_deref().unwrap_or(""),
        prefix: PREFIX_SEPARATOR.split(&snippet.prefix).collect(),
        body: [snippet.body.as_str()],
        description: &snippet.name,
    };
    let document = BTreeMap::from([(snippet.name.as_str(), entry)]);

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    let json = String::from_utf8(buf).map_err(|e| ExportError::Serialize(e.to_string()))?;

    let eol = newline.as_str();
    Ok(format!("{json}{eol}{eol}// {}", source.replace('\n', "\n// ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snippet(name: &str, scope: Option<&str>, prefix: &str, body: &str) -> ParsedSnippet {
        ParsedSnippet {
            name: name.to_string(),
            scope: scope.map(str::to_string),
            prefix: prefix.to_string(),
            body: body.to_string(),
        }
    }

    // =========================================================================
    // File names
    // =========================================================================

    #[test]
    fn test_file_name_with_scope() {
        let s = snippet("greet", Some("javascript"), "hi", "x");
        assert_eq!(file_name(&s), "javascript.[hi - greet].code-snippets");
    }

    #[test]
    fn test_file_name_without_scope() {
        let s = snippet("greet", None, "hi", "x");
        assert_eq!(file_name(&s), "[hi - greet].code-snippets");
    }

    #[test]
    fn test_file_name_strips_invalid_characters() {
        let s = snippet("a/b: \"c\" <d>", None, "x|y?", "x");
        assert_eq!(file_name(&s), "[xy - ab c d].code-snippets");
    }

    #[test]
    fn test_file_name_collapses_whitespace() {
        let s = snippet("two   words", Some("rust"), "p  ", "x");
        assert_eq!(file_name(&s), "rust.[p - two words].code-snippets");
    }

    #[test]
    fn test_file_name_removes_backslash_and_percent() {
        let s = snippet("50% off\\now", None, "*p", "x");
        assert_eq!(file_name(&s), "[p - 50 offnow].code-snippets");
    }

    // =========================================================================
    // Content
    // =========================================================================

    #[test]
    fn test_content_exact() {
        let source =
            "// Name: greet\n// Scope: javascript\n// Prefix: hi\n// ----\nconsole.log(\"hi\");";
        let s = snippet("greet", Some("javascript"), "hi", "console.log(\"hi\");");
        let expected = r#"{
    "greet": {
        "scope": "javascript",
        "prefix": [
            "hi"
        ],
        "body": [
            "console.log(\"hi\");"
        ],
        "description": "greet"
    }
}

// // Name: greet
// // Scope: javascript
// // Prefix: hi
// // ----
// console.log("hi");"#;
        assert_eq!(content(&s, source, LineEnding::Lf).unwrap(), expected);
    }

    #[test]
    fn test_content_splits_prefix_and_defaults_scope() {
        let s = snippet("n", None, "hi , hello,hey", "a\nb\n");
        let out = content(&s, "src\n", LineEnding::Lf).unwrap();
        let expected = r#"{
    "n": {
        "scope": "",
        "prefix": [
            "hi",
            "hello",
            "hey"
        ],
        "body": [
            "a\nb\n"
        ],
        "description": "n"
    }
}

// src
// "#;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_content_crlf_separator() {
        let s = snippet("n", None, "p", "b");
        let out = content(&s, "src", LineEnding::Crlf).unwrap();
        assert!(out.ends_with("}\r\n\r\n// src"));
        assert!(out.starts_with("{\n    \"n\": {\n"));
    }

    #[test]
    fn test_content_crlf_source_keeps_carriage_returns() {
        let s = snippet("n", None, "p", "b");
        let out = content(&s, "a\r\nb", LineEnding::Lf).unwrap();
        assert!(out.ends_with("\n\n// a\r\n// b"));
    }

    #[test]
    fn test_snippet_file_combines_name_and_content() {
        let s = snippet("greet", None, "hi", "x");
        let file = SnippetFile::new(&s, "src", LineEnding::Lf).unwrap();
        assert_eq!(file.file_name, "[hi - greet].code-snippets");
        assert!(file.content.ends_with("\n\n// src"));
    }
}
