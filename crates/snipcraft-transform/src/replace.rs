//! Chained find/replace operations.
//!
//! Each step runs over the output of the previous step. Patterns are
//! compiled multi-line with global replacement; templates are escape
//! decoded first, then expanded by [`Template`].
//!
//! A step whose pattern fails to compile stops the chain. The output of
//! the steps before it is kept in the error, not rolled back.

use regex::{Captures, RegexBuilder};
use serde::{Deserialize, Serialize};
use snipcraft_text::decode_escapes;

use crate::template::Template;
use crate::TransformError;

/// One find/replace pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceStep {
    pub find: String,
    pub replace: String,
}

impl ReplaceStep {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// A named, ordered list of replace steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOperation {
    pub name: String,
    pub steps: Vec<ReplaceStep>,
}

impl ReplaceOperation {
    pub fn new(name: impl Into<String>, steps: Vec<ReplaceStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Run every step over `text`.
    pub fn apply(&self, text: &str) -> Result<String, TransformError> {
        log::debug!("running replace operation '{}'", self.name);
        apply_steps(&self.steps, text)
    }
}

/// Apply `steps` in order, feeding each step the previous output.
pub fn apply_steps(steps: &[ReplaceStep], text: &str) -> Result<String, TransformError> {
    let mut buffer = text.to_string();

    for (index, step) in steps.iter().enumerate() {
        let pattern = match RegexBuilder::new(&step.find).multi_line(true).build() {
            Ok(pattern) => pattern,
            Err(e) => {
                log::warn!("replace step {} aborted the chain: {e}", index + 1);
                return Err(TransformError::ReplaceStepFailed {
                    step: index,
                    pattern: step.find.clone(),
                    message: e.to_string(),
                    committed: buffer,
                });
            }
        };

        let template = Template::parse(&decode_escapes(&step.replace), &pattern);
        let replaced = pattern
            .replace_all(&buffer, |caps: &Captures<'_>| template.expand(caps, &buffer))
            .into_owned();
        log::debug!("replace step {} /{}/ applied", index + 1, step.find);
        buffer = replaced;
    }

    Ok(buffer)
}
