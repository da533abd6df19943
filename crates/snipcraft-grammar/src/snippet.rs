use serde::Serialize;

/// Fields extracted from a snippet definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSnippet {
    pub name: String,
    pub scope: Option<String>,
    /// Comma separated trigger list, exactly as written.
    pub prefix: String,
    /// Everything after the separator line, verbatim.
    pub body: String,
}
