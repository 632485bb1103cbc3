//! JSON-file key-value store
//!
//! The file holds one JSON object mapping keys to string values. Every write
//! rewrites the whole file through a temporary file in the same directory,
//! so readers never observe a torn file. Two processes writing the same file
//! race with last-write-wins.

use super::KeyValueStore;
use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Key-value store backed by a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. A file that is not a JSON object
    /// (including one with invalid UTF-8) is also treated as empty and is
    /// replaced on the next write. Entries whose value is not a string are
    /// dropped one by one so the remaining keys still load.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read(&path) {
            Ok(bytes) => decode_entries(&path, &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let parent_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer_pretty(&mut writer, &self.entries)?;
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(&self.path)
            .map_err(|e| crate::error::SentiviewError::Io(e.error))?;

        debug!("Wrote {} keys to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

fn decode_entries(path: &Path, bytes: &[u8]) -> BTreeMap<String, String> {
    let raw = match serde_json::from_slice::<BTreeMap<String, Value>>(bytes) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                "Store file {} is corrupt ({}), starting empty",
                path.display(),
                e
            );
            return BTreeMap::new();
        }
    };

    let mut entries = BTreeMap::new();
    for (key, value) in raw {
        match value {
            Value::String(value) => {
                entries.insert(key, value);
            }
            other => warn!(
                "Dropping key {} from {}: expected a string, found {}",
                key,
                path.display(),
                other
            ),
        }
    }
    debug!("Loaded {} keys from {}", entries.len(), path.display());
    entries
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value);
        }
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
