//! snipcraft text engines
//!
//! Line-level text primitives shared by the snipcraft tools: line endings,
//! tab-aware width, backslash escape decoding, and the regex-driven column
//! alignment engine.
//!
//! # Example
//!
//! ```
//! use snipcraft_text::{align_text, LineEnding, TabSize};
//!
//! let aligned = align_text("a = 1\nlong = 2", "=", 0, LineEnding::Lf, TabSize::new(4)).unwrap();
//! assert_eq!(aligned, "a    = 1\nlong = 2");
//! ```

pub mod align;
pub mod block;
pub mod config;
pub mod escape;
pub mod line_ending;
pub mod metrics;

pub use align::{align_text, changed_lines, split_passes, LineEdit};
pub use block::{Block, Line, Part, PartKind};
pub use config::TabSize;
pub use escape::decode_escapes;
pub use line_ending::LineEnding;

/// Alignment error raised before any line is tokenized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
