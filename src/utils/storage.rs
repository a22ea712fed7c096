// ============================================================================
// STORAGE - JSON entries in browser key/value storage
// ============================================================================
// TabStorage   -> sessionStorage (cleared when the tab's session ends)
// DurableStorage -> localStorage (kept until changed)
// MemoryStorage  -> in-process map for native tests
// ============================================================================

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::rc::Rc;

use gloo_storage::{LocalStorage, SessionStorage, Storage};
use serde::{de::DeserializeOwned, Serialize};

/// Raw string key/value area
pub trait StorageArea {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str);
}

pub type SharedStorage = Rc<dyn StorageArea>;

#[derive(Clone, Copy, Debug, Default)]
pub struct TabStorage;

impl StorageArea for TabStorage {
    fn read(&self, key: &str) -> Option<String> {
        SessionStorage::raw().get_item(key).ok()?
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        SessionStorage::raw()
            .set_item(key, value)
            .map_err(|_| format!("Could not write {} to sessionStorage", key))
    }

    fn remove(&self, key: &str) {
        SessionStorage::delete(key);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DurableStorage;

impl StorageArea for DurableStorage {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok()?
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|_| format!("Could not write {} to localStorage", key))
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl StorageArea for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

pub fn save_json<T: Serialize>(area: &dyn StorageArea, key: &str, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value).map_err(|e| format!("Could not serialize {}: {}", key, e))?;
    area.write(key, &json)
}

/// Load and decode an entry. A corrupt entry is removed and reported as missing.
pub fn load_json<T: DeserializeOwned>(area: &dyn StorageArea, key: &str) -> Option<T> {
    let json = area.read(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ [STORAGE] Discarding unreadable entry {}: {}", key, e);
            area.remove(key);
            None
        }
    }
}
