//! Values that outlive a single command.
//!
//! The tab-stop counter and the saved replace operations belong to the
//! host's settings store. Commands read them through the backend traits,
//! compute the next value, and write it back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::replace::ReplaceOperation;
use crate::TransformError;

/// Settings key of the tab-stop counter.
pub const COUNTER_KEY: &str = "counter";

/// Stored counter value before the first tab-stop is made.
pub const COUNTER_SEED: i64 = 10;

/// Amount the counter advances per tab-stop.
pub const COUNTER_STEP: i64 = 10;

/// Integer settings storage.
pub trait CounterBackend {
    fn get(&self, key: &str, default: i64) -> i64;
    fn set(&mut self, key: &str, value: i64);
}

/// Storage for the list of saved replace operations.
pub trait OperationBackend {
    fn load(&self) -> Vec<ReplaceOperation>;
    fn save(&mut self, operations: &[ReplaceOperation]);
}

/// Tab-stop numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterState(i64);

impl CounterState {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The state after a reset; the next tab-stop gets number 10.
    pub fn reset() -> Self {
        Self(0)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Number for the next tab-stop, and the state to store afterwards.
    pub fn next(self) -> (i64, Self) {
        let value = self.0 + COUNTER_STEP;
        (value, Self(value))
    }

    /// Read the counter from `backend`.
    pub fn load(backend: &impl CounterBackend) -> Self {
        Self(backend.get(COUNTER_KEY, COUNTER_SEED))
    }

    pub fn save(self, backend: &mut impl CounterBackend) {
        backend.set(COUNTER_KEY, self.0);
    }

    /// Load, advance and store the counter, returning the tab-stop number.
    pub fn advance(backend: &mut impl CounterBackend) -> i64 {
        let (value, next) = Self::load(backend).next();
        next.save(backend);
        value
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self(COUNTER_SEED)
    }
}

/// Saved replace operations, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationStore {
    operations: Vec<ReplaceOperation>,
}

impl OperationStore {
    pub fn new(operations: Vec<ReplaceOperation>) -> Self {
        Self { operations }
    }

    pub fn load(backend: &impl OperationBackend) -> Self {
        Self::new(backend.load())
    }

    pub fn save(&self, backend: &mut impl OperationBackend) {
        backend.save(&self.operations);
    }

    /// Saved operations in insertion order.
    pub fn list(&self) -> &[ReplaceOperation] {
        &self.operations
    }

    pub fn get(&self, name: &str) -> Option<&ReplaceOperation> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Insert `operation`, replacing one with the same name in place.
    ///
    /// Returns `true` when an existing operation was replaced.
    pub fn upsert(&mut self, operation: ReplaceOperation) -> bool {
        match self.operations.iter_mut().find(|op| op.name == operation.name) {
            Some(existing) => {
                *existing = operation;
                true
            }
            None => {
                self.operations.push(operation);
                false
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ReplaceOperation> {
        let index = self.operations.iter().position(|op| op.name == name)?;
        Some(self.operations.remove(index))
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), TransformError> {
        if from != to && self.get(to).is_some() {
            return Err(TransformError::DuplicateOperation(to.to_string()));
        }
        let operation = self
            .operations
            .iter_mut()
            .find(|op| op.name == from)
            .ok_or_else(|| TransformError::UnknownOperation(from.to_string()))?;
        operation.name = to.to_string();
        Ok(())
    }
}

/// In-memory backend for hosts without a settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub values: HashMap<String, i64>,
    #[serde(default)]
    pub operations: Vec<ReplaceOperation>,
}

impl CounterBackend for MemoryStore {
    fn get(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}

impl OperationBackend for MemoryStore {
    fn load(&self) -> Vec<ReplaceOperation> {
        self.operations.clone()
    }

    fn save(&mut self, operations: &[ReplaceOperation]) {
        self.operations = operations.to_vec();
    }
}
