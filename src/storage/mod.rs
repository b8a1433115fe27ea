// Key-value boundary for state that survives a reload: the persisted
// language preference and the 404 redirect-path handoff. Injected so tests
// substitute a store instead of mocking globals. The full key list lives in
// core::constants.
use crate::core::error::{AppError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store, the default for tests and embedders without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().unwrap().remove(key);
        Ok(())
    }
}

/// JSON-file-backed store; every write is flushed so a crash loses at most
/// the in-flight key.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(AppError::Io)?;
            serde_json::from_str(&content)
                .map_err(|e| AppError::Storage(format!("corrupt store {}: {}", path.display(), e)))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn flush(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(AppError::Io)?;
            }
        }
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(AppError::Io)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().unwrap();
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}
