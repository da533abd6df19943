//! Snipcraft snippet grammar
//!
//! Parses a snippet definition written as comment headers followed by a
//! separator line and the body:
//!
//! ```text
//! // Name: greet
//! // Scope: javascript
//! // Prefix: hi
//! // ----
//! console.log("hi");
//! ```
//!
//! Failures come back as a [`SyntaxError`] pointing at the furthest
//! position the parser reached.

pub mod error;
pub mod parser;
pub mod snippet;

pub use error::{Expectation, Location, Position, SyntaxError};
pub use parser::Parser;
pub use snippet::ParsedSnippet;

/// Parse a snippet definition.
pub fn parse(source: &str) -> Result<ParsedSnippet, SyntaxError> {
    Parser::parse(source)
}
