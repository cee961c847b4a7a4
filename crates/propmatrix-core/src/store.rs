//! Persisted key-value store with change notification.
//!
//! Viewer preferences go through [`KeyValueStore`]. [`MemoryStore`] backs
//! tests, [`FileStore`] keeps a JSON document on disk, and
//! [`ObservableStore`] wraps either one and notifies subscribers on change.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write store file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode store value")]
    Json(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Typed read; values that fail to decode read as absent.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        self.get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    fn set_as<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(value)?;
        self.set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file is missing or unreadable.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(path = %path.display(), %error, "failed to parse store file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read store file, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content).map_err(io_error)?;
        info!(path = %self.path.display(), "saved store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Identifies a listener registered on an [`ObservableStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&str, Option<&Value>)>;

/// Store wrapper that notifies listeners after each successful change.
pub struct ObservableStore<S> {
    inner: S,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl<S: KeyValueStore> ObservableStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers `listener`, called with the key and its new value
    /// (`None` on removal).
    pub fn subscribe(&mut self, listener: impl Fn(&str, Option<&Value>) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn notify(&self, key: &str, value: Option<&Value>) {
        for (_, listener) in &self.listeners {
            listener(key, value);
        }
    }
}

impl<S: KeyValueStore> KeyValueStore for ObservableStore<S> {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.inner.get(key).as_ref() == Some(&value) {
            return Ok(());
        }
        self.inner.set(key, value.clone())?;
        self.notify(key, Some(&value));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.inner.get(key).is_none() {
            return Ok(());
        }
        self.inner.remove(key)?;
        self.notify(key, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    #[test]
    fn memory_store_typed_round_trip() {
        let mut store = MemoryStore::new();
        store.set_as("fullRender", &true).unwrap();
        assert_eq!(store.get_as::<bool>("fullRender"), Some(true));
        assert_eq!(store.get_as::<String>("fullRender"), None);
    }

    #[test]
    fn observable_store_notifies_changes_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut store = ObservableStore::new(MemoryStore::new());
        let id = store.subscribe(move |key, value| {
            sink.borrow_mut().push((key.to_string(), value.cloned()));
        });

        store.set("theme", json!("dark")).unwrap();
        store.set("theme", json!("dark")).unwrap();
        store.remove("theme").unwrap();
        store.remove("theme").unwrap();
        assert!(store.unsubscribe(id));
        store.set("theme", json!("light")).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                ("theme".to_string(), Some(json!("dark"))),
                ("theme".to_string(), None),
            ]
        );
    }
}
