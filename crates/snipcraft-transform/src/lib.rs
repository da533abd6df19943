//! snipcraft transforms
//!
//! Editor-facing rewrites built on `snipcraft-text`:
//! choice and plain tab-stop syntax (and the inverse of choice syntax),
//! snippet character escaping, and named chains of find/replace steps.
//!
//! ```text
//! Selection ─▶ command::* ─▶ Outcome { Replace | ReplaceLines | ReplaceDocument | Notice }
//! ```
//!
//! Persistent values (the tab-stop counter and the saved operations) are
//! read and written through the `CounterBackend` and `OperationBackend`
//! traits implemented by the host.

pub mod choice;
pub mod command;
pub mod replace;
pub mod state;
pub mod tabstop;
pub mod template;

pub use choice::{decode_choice, encode_choice, is_choice};
pub use command::{Notice, Outcome, Selection};
pub use replace::{apply_steps, ReplaceOperation, ReplaceStep};
pub use state::{CounterBackend, CounterState, MemoryStore, OperationBackend, OperationStore};
pub use tabstop::{escape_snippet_syntax, tab_stop};
pub use template::Template;

/// Transform failure reported to the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Steps before `step` were applied; `committed` holds their output.
    #[error("Replace step {} failed, pattern '{pattern}': {message}", .step + 1)]
    ReplaceStepFailed {
        step: usize,
        pattern: String,
        message: String,
        committed: String,
    },

    #[error("No replace operation named '{0}'")]
    UnknownOperation(String),

    #[error("A replace operation named '{0}' already exists")]
    DuplicateOperation(String),
}

impl From<snipcraft_text::AlignError> for TransformError {
    fn from(err: snipcraft_text::AlignError) -> Self {
        match err {
            snipcraft_text::AlignError::InvalidPattern { pattern, message } => {
                Self::InvalidPattern { pattern, message }
            }
        }
    }
}
