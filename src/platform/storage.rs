//! Key-value persistence backends
//!
//! Mirrors the browser's `localStorage` shape (string keys, string values) so
//! the same history and settings code runs in the browser, natively and in
//! tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// String key-value storage.
pub trait KeyValueStore {
    /// Read a value, `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value stored under `key`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(json) = store.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &json)
}

/// In-memory store. Clones share the same map, which lets a test "restart"
/// the engine against the data a previous instance wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a data directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;
        std::fs::write(self.path_for(key), value).map_err(|e| Self::io_error(key, e))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

/// The browser's `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }

    fn js_error(key: &str, err: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Browser {
            key: key.to_string(),
            message: format!("{err:?}"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| Self::js_error(key, e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| Self::js_error(key, e))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| Self::js_error(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_items() {
        let mut store = MemoryStore::new();
        let reader = store.clone();
        store.set_item("k", "v").unwrap();
        assert_eq!(reader.get_item("k").unwrap().as_deref(), Some("v"));

        store.remove_item("k").unwrap();
        assert!(reader.get_item("k").unwrap().is_none());
        // Removing twice is fine
        store.remove_item("k").unwrap();
    }

    #[test]
    fn test_json_helpers() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "nums", &vec![1, 2, 3]).unwrap();
        let nums: Option<Vec<u32>> = load_json(&store, "nums").unwrap();
        assert_eq!(nums, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = load_json(&store, "nope").unwrap();
        assert!(missing.is_none());

        store.set_item("bad", "{not json").unwrap();
        let bad: Result<Option<Vec<u32>>, _> = load_json(&store, "bad");
        assert!(matches!(bad, Err(StorageError::Serialize { .. })));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!(
            "duck_race_store_test_{}",
            std::process::id()
        ));
        let mut store = FileStore::new(&dir);

        assert!(store.get_item("history").unwrap().is_none());
        store.set_item("history", "[]").unwrap();
        assert_eq!(store.get_item("history").unwrap().as_deref(), Some("[]"));
        store.remove_item("history").unwrap();
        assert!(store.get_item("history").unwrap().is_none());
        store.remove_item("history").unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_keeps_io_cause() {
        use std::error::Error;

        // A plain file where the data directory should be
        let blocker = std::env::temp_dir().join(format!(
            "duck_race_store_blocker_{}",
            std::process::id()
        ));
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut store = FileStore::new(&blocker);
        let err = store.set_item("history", "[]").unwrap_err();
        assert!(matches!(&err, StorageError::Io { key, .. } if key == "history"));
        let cause = err.source().expect("io cause kept");
        assert!(cause.downcast_ref::<std::io::Error>().is_some());

        let _ = std::fs::remove_file(&blocker);
    }
}
