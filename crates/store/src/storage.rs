//! Durable string key/value storage behind the store.

use anyhow::{Context as _, Error};
use log::error;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// String key/value storage with browser-storage item semantics.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error when the backing medium rejects the write.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns an error when the backing medium rejects the write.
    fn remove_item(&mut self, key: &str) -> Result<(), Error>;
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON object in a single file. Writes go to disk
/// immediately; a corrupt file is logged and reset rather than fatal.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or create on first write) storage at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    error!(
                        "resetting corrupt session storage at {}: {err}",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading session storage at {}", path.display()));
            }
        };
        Ok(Self { path, items })
    }

    fn persist(&self) -> Result<(), Error> {
        let raw = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing session storage at {}", self.path.display()))
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_owned(), value.to_owned());
        self.persist()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        if self.items.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
