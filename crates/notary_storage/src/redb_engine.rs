//! Persistent engine backed by `redb`.

use crate::backend::KvEngine;
use crate::batch::{BatchOp, WriteBatch};
use crate::error::{EngineError, EngineResult};
use crate::options::{EngineOptions, WriteOptions};
use redb::{Database, Durability, TableDefinition};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the engine's data file inside the store directory.
pub const DATA_FILE: &str = "data.redb";

// Single flat table; logical tables are multiplexed by key prefix above this layer.
const DATA_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("data");

/// A persistent ordered engine using a single `redb` database file.
///
/// # Durability
///
/// - `WriteOptions { sync: true }` commits with `Durability::Immediate`
/// - `WriteOptions { sync: false }` commits with `Durability::Eventual`
///
/// # Options
///
/// `block_cache_bytes` maps to the redb page cache. redb keeps one file
/// open and never compresses pages, so `max_open_files` and `compression`
/// have no effect.
///
/// # Example
///
/// ```no_run
/// use notary_storage::{EngineOptions, KvEngine, RedbEngine, WriteOptions};
/// use std::path::Path;
///
/// let mut engine = RedbEngine::open(Path::new("store"), &EngineOptions::default()).unwrap();
/// engine.put(b"key", b"value", &WriteOptions::default()).unwrap();
/// engine.close().unwrap();
/// ```
pub struct RedbEngine {
    path: PathBuf,
    db: Option<Database>,
}

impl RedbEngine {
    /// Returns the path of the underlying database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn db(&self) -> EngineResult<&Database> {
        self.db.as_ref().ok_or(EngineError::Closed)
    }
}

impl fmt::Debug for RedbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbEngine")
            .field("path", &self.path)
            .field("open", &self.db.is_some())
            .finish()
    }
}

fn durability(options: &WriteOptions) -> Durability {
    if options.sync {
        Durability::Immediate
    } else {
        Durability::Eventual
    }
}

impl KvEngine for RedbEngine {
    fn open(path: &Path, options: &EngineOptions) -> EngineResult<Self> {
        let file = path.join(DATA_FILE);

        let mut builder = Database::builder();
        if let Some(bytes) = options.block_cache_bytes {
            builder.set_cache_size(bytes);
        }
        if options.max_open_files.is_some() || !options.compression {
            tracing::debug!(?options, "redb ignores open-file and compression settings");
        }
        let db = builder.create(&file)?;

        // Reads on a missing table fail, so create it up front.
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(DATA_TABLE)?;
        }
        txn.commit()?;

        tracing::debug!(path = %file.display(), "redb engine opened");
        Ok(Self {
            path: file,
            db: Some(db),
        })
    }

    fn get(&self, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        let txn = self.db()?.begin_read()?;
        let table = txn.open_table(DATA_TABLE)?;
        let value = table.get(key)?.map(|v| v.value().to_vec());
        Ok(value)
    }

    fn put(&mut self, key: &[u8], value: &[u8], options: &WriteOptions) -> EngineResult<()> {
        let mut batch = WriteBatch::new();
        batch.stage_put(key, value);
        self.write(&batch, options)
    }

    fn delete(&mut self, key: &[u8], options: &WriteOptions) -> EngineResult<()> {
        let mut batch = WriteBatch::new();
        batch.stage_delete(key);
        self.write(&batch, options)
    }

    fn write(&mut self, batch: &WriteBatch, options: &WriteOptions) -> EngineResult<()> {
        let mut txn = self.db()?.begin_write()?;
        txn.set_durability(durability(options));
        {
            let mut table = txn.open_table(DATA_TABLE)?;
            for op in batch.ops() {
                match op {
                    BatchOp::Put { key, value } => {
                        table.insert(key.as_slice(), value.as_slice())?;
                    }
                    BatchOp::Delete { key } => {
                        table.remove(key.as_slice())?;
                    }
                }
            }
        }
        // Dropping an uncommitted transaction aborts it.
        txn.commit()?;
        Ok(())
    }

    fn close(&mut self) -> EngineResult<()> {
        match self.db.take() {
            Some(db) => {
                drop(db);
                tracing::debug!(path = %self.path.display(), "redb engine closed");
                Ok(())
            }
            None => Err(EngineError::Closed),
        }
    }
}
