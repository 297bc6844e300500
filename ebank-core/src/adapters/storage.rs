//! Session storage backends
//!
//! `FileSessionStorage` keeps a flat JSON object of string values in
//! `<ebank_dir>/session.json`. Keys it doesn't own are preserved on write.
//! `MemorySessionStorage` is the in-process equivalent for tests and
//! one-shot runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value as JsonValue};

use crate::domain::result::{Error, Result};
use crate::ports::SessionStorage;

/// File name of the persisted session inside the eBank directory
pub const SESSION_FILE: &str = "session.json";

/// Session storage backed by a JSON file
pub struct FileSessionStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(ebank_dir: &Path) -> Self {
        Self {
            path: ebank_dir.join(SESSION_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, JsonValue>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<JsonValue>(&content)? {
            JsonValue::Object(map) => Ok(map),
            _ => Err(Error::storage(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, JsonValue>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write to a sibling file, then rename over the original
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(map)?;
        std::fs::write(&tmp_path, content)?;
        restrict_permissions(&tmp_path)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Apply `update` to the stored map; a corrupt file is replaced
    fn update(&self, update: impl FnOnce(&mut Map<String, JsonValue>)) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| Error::storage(format!("Lock error: {}", e)))?;

        let mut map = self.read_map().unwrap_or_default();
        update(&mut map);
        self.write_map(&map)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| Error::storage(format!("Lock error: {}", e)))?;

        let map = self.read_map()?;
        Ok(map.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|map| {
            map.insert(key.to_string(), JsonValue::String(value.to_string()));
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), JsonValue::String(value.to_string()));
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

/// In-memory session storage
#[derive(Default)]
pub struct MemorySessionStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| Error::storage(format!("Lock error: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| Error::storage(format!("Lock error: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| Error::storage(format!("Lock error: {}", e)))?;
        for (key, value) in entries {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| Error::storage(format!("Lock error: {}", e)))?;
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}
