//! Persistence of UI selection state across sessions.
//!
//! The engine only remembers one thing per rendered instance: the selected
//! tab index. It reaches the store through the narrow [`UiMemory`] interface
//! so hosts can plug in their own preference system; the bundled
//! [`TomlUiMemory`] keeps a TOML file under `config/`, loaded leniently and
//! saved explicitly.

use crate::object::InstanceId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_UI_STATE_PATH: &str = "config/ui_state.toml";

/// Integer key/value store for remembered UI selections.
pub trait UiMemory {
    /// Read a remembered value.
    fn get_int(&self, key: &str) -> Option<i64>;
    /// Remember a value.
    fn set_int(&mut self, key: &str, value: i64);
}

/// Memory key for the selected tab of one rendered instance + field path.
pub fn tab_key(instance: InstanceId, path: &str) -> String {
    format!("tab:{}:{}", instance.index(), path)
}

/// Volatile memory for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryUiMemory {
    entries: HashMap<String, i64>,
}

impl MemoryUiMemory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiMemory for MemoryUiMemory {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.entries.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.entries.insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UiStateFile {
    entries: HashMap<String, i64>,
}

/// TOML-file backed memory.
#[derive(Debug)]
pub struct TomlUiMemory {
    path: PathBuf,
    state: UiStateFile,
}

impl TomlUiMemory {
    /// Load from the default path (`config/ui_state.toml`).
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_UI_STATE_PATH))
    }

    /// Load from an explicit path, falling back to an empty store on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let state = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<UiStateFile>(&contents) {
                Ok(state) => state,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Starting fresh", path.display());
                    UiStateFile::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Starting fresh", path.display());
                }
                UiStateFile::default()
            }
        };
        Self {
            path: path.to_path_buf(),
            state,
        }
    }

    /// Write the store back to its file.
    pub fn save(&self) -> Result<()> {
        let toml = toml::to_string_pretty(&self.state)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml)?;
        Ok(())
    }
}

impl UiMemory for TomlUiMemory {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.state.entries.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.state.entries.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut memory = MemoryUiMemory::new();
        assert_eq!(memory.get_int("tab:0:root"), None);
        memory.set_int("tab:0:root", 2);
        assert_eq!(memory.get_int("tab:0:root"), Some(2));
    }

    #[test]
    fn toml_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_state.toml");

        let mut memory = TomlUiMemory::load_from_path(&path);
        memory.set_int(&tab_key(InstanceId::from_index(7), "root"), 3);
        memory.save().unwrap();

        let reloaded = TomlUiMemory::load_from_path(&path);
        assert_eq!(reloaded.get_int("tab:7:root"), Some(3));
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_state.toml");
        fs::write(&path, "entries = 12 not toml").unwrap();

        let memory = TomlUiMemory::load_from_path(&path);
        assert_eq!(memory.get_int("tab:0:root"), None);
    }
}
