//! Snipcraft snippet export
//!
//! Turns a snippet definition into the file an editor loads as a user
//! snippet. Producing the name, content and target folder is all this crate
//! does; writing the file is left to the host.

pub mod directory;
pub mod file;

pub use directory::{Platform, SnippetDirectory};
pub use file::{content, file_name, SnippetFile};

use snipcraft_grammar::SyntaxError;
use snipcraft_text::LineEnding;

/// Export error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("Cannot locate the user directory: {0} is not set")]
    MissingEnvironment(&'static str),
    #[error("Failed to serialize snippet: {0}")]
    Serialize(String),
}

/// Parse `source` and build its snippet file.
pub fn export(source: &str, newline: LineEnding) -> Result<SnippetFile, ExportError> {
    let snippet = snipcraft_grammar::parse(source)?;
    SnippetFile::new(&snippet, source, newline)
}
