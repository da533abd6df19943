//! JSON file standing in for the editor's settings store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snipcraft_transform::state::COUNTER_KEY;
use snipcraft_transform::{CounterBackend, OperationBackend, ReplaceOperation};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Contents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    counter: Option<i64>,
    #[serde(default)]
    operations: Vec<ReplaceOperation>,
}

/// `{ "counter": 20, "operations": [...] }` on disk.
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
    contents: Contents,
}

impl StateFile {
    /// Load `path`; a missing file is an empty state.
    pub fn open(path: &Path) -> io::Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no state file at {}, starting empty", path.display());
                Contents::default()
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: path.to_path_buf(),
            contents,
        })
    }

    pub fn write(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json + "\n")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CounterBackend for StateFile {
    fn get(&self, key: &str, default: i64) -> i64 {
        match key {
            COUNTER_KEY => self.contents.counter.unwrap_or(default),
            _ => default,
        }
    }

    fn set(&mut self, key: &str, value: i64) {
        match key {
            COUNTER_KEY => self.contents.counter = Some(value),
            _ => log::warn!("ignoring unknown state key '{key}'"),
        }
    }
}

impl OperationBackend for StateFile {
    fn load(&self) -> Vec<ReplaceOperation> {
        self.contents.operations.clone()
    }

    fn save(&mut self, operations: &[ReplaceOperation]) {
        self.contents.operations = operations.to_vec();
    }
}
