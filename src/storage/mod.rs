//! Durable local key-value storage
//!
//! Aggregates are persisted the way a browser persists `localStorage`: string
//! values under string keys, read once on startup and rewritten on every
//! change. [`FileStore`] keeps them in a JSON file; [`MemoryStore`] keeps them
//! in memory for tests and dry runs.

pub mod file;
pub mod memory;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key-value backend for persisted aggregates
///
/// Writes complete before the call returns.
pub trait KeyValueStore: Send {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Write several keys as one update
    ///
    /// The default writes them one by one; backends that can do better
    /// override it.
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Delete `key`; missing keys are not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        (**self).set_many(entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
