use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::store::StateStore;

/// State store backed by a single JSON object on disk.
///
/// The whole map is loaded at open and rewritten on every mutation. The
/// persisted state is a handful of short strings, so there is no batching
/// or partial-write handling.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store, creating an empty one if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::Store(format!("Corrupt state file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(AppError::Store(format!(
                    "Failed to read state file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn write_out(&self, entries: &HashMap<String, String>) -> AppResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Store(format!("Failed to serialize state: {}", e)))?;
        std::fs::write(&self.path, json).map_err(|e| {
            AppError::Store(format!(
                "Failed to write state file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Store("state mutex poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Store("state mutex poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.write_out(&entries)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Store("state mutex poisoned".to_string()))?;
        if entries.remove(key).is_some() {
            self.write_out(&entries)?;
        }
        Ok(())
    }
}
