//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test data.

use notary_core::{ChainId, Config, Entry, Hash, NotaryDb, HASH_SIZE};
use notary_storage::{InMemoryEngine, RedbEngine};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An in-memory test store that keeps a handle on its engine.
pub struct TestStore {
    /// The store instance.
    pub db: NotaryDb<InMemoryEngine>,
    /// Shares state with the store's engine, for seeding and inspection.
    pub engine: InMemoryEngine,
}

impl TestStore {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        let engine = InMemoryEngine::new();
        Self {
            db: NotaryDb::with_engine(engine.clone(), Config::default()),
            engine,
        }
    }
}

impl std::ops::Deref for TestStore {
    type Target = NotaryDb<InMemoryEngine>;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// An on-disk test store with automatic cleanup.
pub struct FileStore {
    /// The store instance.
    pub db: NotaryDb<RedbEngine>,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl FileStore {
    /// Creates a new store inside a fresh temporary directory.
    pub fn create() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = NotaryDb::open(&temp_dir.path().join("store"), Config::create_new())
            .expect("Failed to create file store");
        Self { db, temp_dir }
    }

    /// Returns the store directory.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("store")
    }

    /// Closes the store and reopens it from disk.
    pub fn reopen(self) -> Self {
        self.db.close().expect("Failed to close file store");
        let db = NotaryDb::open(&self.temp_dir.path().join("store"), Config::attach())
            .expect("Failed to reopen file store");
        Self {
            db,
            temp_dir: self.temp_dir,
        }
    }
}

impl std::ops::Deref for FileStore {
    type Target = NotaryDb<RedbEngine>;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory store.
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&NotaryDb<InMemoryEngine>) -> R,
{
    let store = TestStore::memory();
    f(&store.db)
}

/// Runs a test with a temporary on-disk store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&NotaryDb<RedbEngine>, &Path) -> R,
{
    let store = FileStore::create();
    let path = store.path();
    f(&store.db, &path)
}

/// Returns a hash made of 32 copies of `byte`.
pub fn filled_hash(byte: u8) -> Hash {
    Hash::from_bytes([byte; HASH_SIZE])
}

/// Returns a chain ID made of 32 copies of `byte`.
pub fn sample_chain(byte: u8) -> ChainId {
    ChainId::from_bytes([byte; HASH_SIZE])
}

/// Returns a small deterministic entry distinguished by `n`.
pub fn sample_entry(n: u64) -> Entry {
    Entry::new(1_700_000_000 + n, format!("entry-{n}").into_bytes())
        .with_ext_id(n.to_be_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_exposes_engine() {
        let store = TestStore::memory();
        store.insert_entry(&sample_entry(1), &sample_chain(1)).unwrap();
        assert_eq!(store.engine.len(), 2);
    }

    #[test]
    fn file_store_reopens_with_data() {
        let store = FileStore::create();
        let hash = store.insert_entry(&sample_entry(7), &sample_chain(7)).unwrap();

        let store = store.reopen();
        assert_eq!(
            store.fetch_entry_by_hash(&hash).unwrap(),
            Some(sample_entry(7))
        );
    }

    #[test]
    fn sample_entries_differ() {
        assert_ne!(sample_entry(1).hash().unwrap(), sample_entry(2).hash().unwrap());
    }
}
