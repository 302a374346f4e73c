//! Store facade and lifecycle.

use crate::config::Config;
use crate::dir::StoreDir;
use crate::entry::{Entry, EntryStore, QueueStatus};
use crate::error::CoreResult;
use crate::handle::StoreHandle;
use crate::provenance::{EbInfo, EntryInfo, EntryInfoBranch, FbBatch};
use crate::types::{ChainId, Hash};
use crate::version::SchemaVersion;
use notary_storage::{EngineOptions, EngineResult, InMemoryEngine, KvEngine, WriteOptions};
use std::path::{Path, PathBuf};

/// The main store handle.
///
/// `NotaryDb` is the primary entry point. It provides:
/// - Opening and version-checking a store directory
/// - Atomic entry + queue-marker inserts
/// - Entry and provenance lookups
/// - Close, rollback-close, and a sync barrier
///
/// # Opening a Store
///
/// ```rust,ignore
/// use notary_core::{Config, NotaryDb};
/// use notary_storage::RedbEngine;
/// use std::path::Path;
///
/// let db = NotaryDb::<RedbEngine>::open(Path::new("notary"), Config::default())?;
/// db.close()?;
/// ```
///
/// # In-Memory Stores
///
/// For testing, use `NotaryDb::open_in_memory()`:
///
/// ```rust
/// use notary_core::{ChainId, Entry, NotaryDb};
///
/// let db = NotaryDb::open_in_memory();
/// let entry = Entry::new(1_700_000_000, b"hello".to_vec());
/// let hash = db.insert_entry(&entry, &ChainId::default()).unwrap();
/// assert_eq!(db.fetch_entry_by_hash(&hash).unwrap(), Some(entry));
/// ```
///
/// # Closing
///
/// After `close()` or `rollback_close()` every operation except `sync()`
/// returns [`crate::CoreError::DatabaseClosed`]. Closing twice is a caller
/// error and is reported, not ignored.
#[derive(Debug)]
pub struct NotaryDb<E> {
    /// Store directory. Empty for stores built directly from an engine.
    path: PathBuf,
    /// Schema version the store was opened with.
    version: SchemaVersion,
    /// Engine plus the operation lock.
    handle: StoreHandle<E>,
}

impl<E: KvEngine> NotaryDb<E> {
    /// Opens a store at `path`, constructing the engine with [`KvEngine::open`].
    ///
    /// The method:
    /// - Creates the directory if missing (when `create_if_missing` is set)
    /// - Reads the `<path>.ver` marker and rejects unsupported versions
    ///   before the engine is opened
    /// - Opens the engine with the version's options
    /// - Writes the marker for newly created stores
    ///
    /// # Errors
    ///
    /// - `NotFound` / `AlreadyExists` for directory conflicts
    /// - `UnsupportedVersion` for an unknown marker
    /// - `Engine` if the engine fails to open
    /// - `Io` for directory or marker failures
    pub fn open(path: &Path, config: Config) -> CoreResult<Self> {
        Self::open_with_engine(path, config, E::open)
    }

    /// Opens a store at `path` using `opener` to construct the engine.
    ///
    /// `opener` receives the store directory and the options selected by
    /// the schema version. It is not called if any check before the engine
    /// open fails.
    pub fn open_with_engine<F>(path: &Path, config: Config, opener: F) -> CoreResult<Self>
    where
        F: FnOnce(&Path, &EngineOptions) -> EngineResult<E>,
    {
        let dir = StoreDir::new(path);
        let created = dir.prepare(config.create_if_missing, config.error_if_exists)?;

        let (version, needs_marker) = match dir.load_version()? {
            Some(raw) => (SchemaVersion::from_i32(raw)?, false),
            None if created => (SchemaVersion::CURRENT, true),
            None => (SchemaVersion::V0, false),
        };

        let options = version.engine_options();
        tracing::debug!(
            path = %path.display(),
            %version,
            created,
            ?options,
            "opening store"
        );

        let engine = opener(path, &options)?;

        // Only mark the store once the engine is known to open.
        if needs_marker {
            dir.save_version(version)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            version,
            handle: StoreHandle::new(engine, write_options(&config)),
        })
    }

    /// Wraps an already open engine without touching the filesystem.
    ///
    /// The store reports [`SchemaVersion::CURRENT`] and an empty path.
    pub fn with_engine(engine: E, config: Config) -> Self {
        Self {
            path: PathBuf::new(),
            version: SchemaVersion::CURRENT,
            handle: StoreHandle::new(engine, write_options(&config)),
        }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the schema version the store was opened with.
    #[must_use]
    pub fn schema_version(&self) -> SchemaVersion {
        self.version
    }

    /// Returns true until the store is closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Returns the entry store.
    #[must_use]
    pub fn entries(&self) -> EntryStore<'_, E> {
        EntryStore::new(&self.handle)
    }

    /// Closes the store and releases the engine.
    pub fn close(&self) -> CoreResult<()> {
        self.handle.close()?;
        tracing::debug!(path = %self.path.display(), "store closed");
        Ok(())
    }

    /// Aborts and shuts down the store.
    ///
    /// Identical to [`NotaryDb::close`]; there is no cross-call transaction
    /// to roll back, and the engine handles its own crash consistency.
    pub fn rollback_close(&self) -> CoreResult<()> {
        self.handle.close()?;
        tracing::debug!(path = %self.path.display(), "store rolled back and closed");
        Ok(())
    }

    /// Returns once no other operation on this store is in flight.
    ///
    /// Every write is already durable when it returns, so this performs no
    /// I/O; it only serializes with concurrent callers.
    pub fn sync(&self) -> CoreResult<()> {
        self.handle.barrier();
        Ok(())
    }

    /// Stores an encoded entry together with its "in queue" marker atomically.
    ///
    /// See [`EntryStore::insert_entry_and_queue`].
    pub fn insert_entry_and_queue(
        &self,
        entry_hash: &Hash,
        serialized_entry: &[u8],
        timestamp: u64,
        chain_id: &ChainId,
    ) -> CoreResult<()> {
        self.entries()
            .insert_entry_and_queue(entry_hash, serialized_entry, timestamp, chain_id)
    }

    /// Encodes and stores `entry` with its queue marker; returns its hash.
    pub fn insert_entry(&self, entry: &Entry, chain_id: &ChainId) -> CoreResult<Hash> {
        self.entries().insert_entry(entry, chain_id)
    }

    /// Gets an entry by hash.
    pub fn fetch_entry_by_hash(&self, entry_hash: &Hash) -> CoreResult<Option<Entry>> {
        self.entries().fetch_entry_by_hash(entry_hash)
    }

    /// Gets the entry-block location of an entry.
    pub fn fetch_entry_info_by_hash(&self, entry_hash: &Hash) -> CoreResult<Option<EntryInfo>> {
        self.entries().fetch_entry_info_by_hash(entry_hash)
    }

    /// Gets the federated-block location of an entry block.
    pub fn fetch_eb_info_by_hash(&self, eb_hash: &Hash) -> CoreResult<Option<EbInfo>> {
        self.entries().fetch_eb_info_by_hash(eb_hash)
    }

    /// Gets the anchoring batch of a federated block.
    pub fn fetch_fb_batch_by_hash(&self, fb_hash: &Hash) -> CoreResult<Option<FbBatch>> {
        self.entries().fetch_fb_batch_by_hash(fb_hash)
    }

    /// Resolves an entry's provenance branch.
    pub fn fetch_entry_info_branch_by_hash(&self, entry_hash: &Hash) -> CoreResult<EntryInfoBranch> {
        self.entries().fetch_entry_info_branch_by_hash(entry_hash)
    }

    /// Gets the status of a queue marker.
    pub fn fetch_queue_status(
        &self,
        chain_id: &ChainId,
        timestamp: u64,
        entry_hash: &Hash,
    ) -> CoreResult<Option<QueueStatus>> {
        self.entries()
            .fetch_queue_status(chain_id, timestamp, entry_hash)
    }
}

impl NotaryDb<InMemoryEngine> {
    /// Opens a fresh in-memory store for testing.
    ///
    /// Data is lost when the store is dropped.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::with_engine(InMemoryEngine::new(), Config::default())
    }
}

fn write_options(config: &Config) -> WriteOptions {
    WriteOptions {
        sync: config.sync_writes,
    }
}
