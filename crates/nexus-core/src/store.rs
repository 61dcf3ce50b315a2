//! Durable key persistence
//!
//! A [`KeyStore`] owns one named [`StorageSlot`] holding the JSON-encoded
//! record collection, plus a clock for expiration checks. Expired records
//! are evicted lazily: every [`KeyStore::load_valid`] filters them out and
//! writes the slot back if anything was dropped, so the slot never keeps a
//! stale entry past a read.
//!
//! Concurrent writers (two processes over one file) are not coordinated;
//! the read-modify-write is not atomic across the read and the later
//! write, so the last writer wins. Known limitation, kept as-is.

use crate::clock::Clock;
use crate::record::KeyRecord;
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A named, synchronous, process-local single-value slot
///
/// The "local storage" collaborator: one entry, read and written whole.
pub trait StorageSlot: Send + Sync {
    /// Current contents, `None` when the slot has never been written
    fn read(&self) -> Option<String>;

    /// Replace the contents
    fn write(&self, contents: &str) -> Result<()>;

    /// Remove the entry entirely
    fn clear(&self) -> Result<()>;
}

/// File-backed slot (one JSON file)
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Slot at a specific path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot at the default location (~/.config/nexuskey/<name>.json)
    pub fn default_location(name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nexuskey");

        std::fs::create_dir_all(&config_dir)?;

        Ok(Self {
            path: config_dir.join(format!("{name}.json")),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&self, contents: &str) -> Result<()> {
        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory slot for tests
#[derive(Default)]
pub struct MemorySlot {
    cell: RwLock<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.cell.read().unwrap().clone()
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self.cell.write().unwrap() = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.cell.write().unwrap() = None;
        Ok(())
    }
}

/// Ordered, durable collection of key records
pub struct KeyStore {
    slot: Box<dyn StorageSlot>,
    clock: Arc<dyn Clock>,
}

impl KeyStore {
    /// Create a store over the given slot and clock
    pub fn new(slot: Box<dyn StorageSlot>, clock: Arc<dyn Clock>) -> Self {
        Self { slot, clock }
    }

    /// Load the collection, evicting expired records
    ///
    /// Absent or unparseable contents count as an empty collection, not
    /// an error. When eviction dropped anything, the filtered collection
    /// is written back before returning, so the slot stays free of
    /// expired entries after every read. Insertion order is preserved.
    pub fn load_valid(&self) -> Result<Vec<KeyRecord>> {
        let saved = self.read_all();
        let now = self.clock.now();

        let valid: Vec<KeyRecord> = saved
            .iter()
            .filter(|record| !record.is_expired(now))
            .cloned()
            .collect();

        if valid.len() != saved.len() {
            self.write_all(&valid)?;
        }

        Ok(valid)
    }

    /// Append a record to the collection
    ///
    /// No dedup, no ordering beyond append order.
    pub fn append(&self, record: KeyRecord) -> Result<()> {
        let mut saved = self.read_all();
        saved.push(record);
        self.write_all(&saved)
    }

    fn read_all(&self) -> Vec<KeyRecord> {
        self.slot
            .read()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    fn write_all(&self, records: &[KeyRecord]) -> Result<()> {
        let contents = serde_json::to_string_pretty(records)?;
        self.slot.write(&contents)
    }
}
