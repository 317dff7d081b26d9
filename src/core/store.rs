/// Catalog persistence: the "already exists" check and the record write.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::builder::Record;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON serialization error: {0}")]
    RonSer(#[from] ron::Error),
    #[error("RON deserialization error: {0}")]
    RonDe(#[from] ron::error::SpannedError),
}

/// Where finished records go. Identities are opaque keys; the store
/// decides how they map to storage.
pub trait CatalogStore {
    fn exists(&self, identity: &str) -> bool;
    fn write(&mut self, identity: &str, record: &Record) -> Result<(), StoreError>;
}

/// In-memory catalog, mostly for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: FxHashMap<String, Record>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &str) -> Option<&Record> {
        self.records.get(identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful `write` calls, including any that replaced an
    /// existing record.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl CatalogStore for MemoryStore {
    fn exists(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    fn write(&mut self, identity: &str, record: &Record) -> Result<(), StoreError> {
        self.records.insert(identity.to_string(), record.clone());
        self.writes += 1;
        Ok(())
    }
}

/// Writes each record to `<root>/<identity>.ron`, creating folders as
/// needed. A record is written to `<identity>.ron.tmp` first and renamed
/// into place, so an interrupted run never leaves a partial `.ron` that a
/// later run would count as present.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.root.join(format!("{}.ron", identity))
    }

    fn staging_path_for(&self, identity: &str) -> PathBuf {
        self.root.join(format!("{}.ron.tmp", identity))
    }

    /// Read a stored record back.
    pub fn read(&self, identity: &str) -> Result<Record, StoreError> {
        let contents = std::fs::read_to_string(self.path_for(identity))?;
        Ok(ron::from_str(&contents)?)
    }
}

impl CatalogStore for DirStore {
    fn exists(&self, identity: &str) -> bool {
        self.path_for(identity).exists()
    }

    fn write(&mut self, identity: &str, record: &Record) -> Result<(), StoreError> {
        let path = self.path_for(identity);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(record, ron::ser::PrettyConfig::default())?;
        let staging = self.staging_path_for(identity);
        std::fs::write(&staging, text)?;
        std::fs::rename(&staging, &path)?;
        Ok(())
    }
}
