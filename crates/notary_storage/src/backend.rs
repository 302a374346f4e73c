//! Engine trait definition.

use crate::batch::WriteBatch;
use crate::error::EngineResult;
use crate::options::{EngineOptions, WriteOptions};
use std::path::Path;

/// An ordered, byte-keyed key/value engine.
///
/// Engines are **opaque sorted byte stores**. NotaryDB multiplexes its
/// logical tables over a single flat keyspace, so an engine only has to
/// provide point operations and atomic batches over raw bytes.
///
/// # Invariants
///
/// - `get` after a successful `put` of the same key returns that value
/// - `write` applies every operation of a batch or none of them
/// - After `close`, every other method returns [`crate::EngineError::Closed`]
///
/// # Implementors
///
/// - [`crate::InMemoryEngine`] - For testing
/// - [`crate::RedbEngine`] - For persistent storage
/// - [`crate::CountingEngine`] - Call-recording wrapper
pub trait KvEngine: Send {
    /// Opens (or creates) the engine's on-disk state inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be opened with `options`.
    fn open(path: &Path, options: &EngineOptions) -> EngineResult<Self>
    where
        Self: Sized;

    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the engine is closed.
    fn get(&self, key: &[u8]) -> EngineResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the engine is closed.
    fn put(&mut self, key: &[u8], value: &[u8], options: &WriteOptions) -> EngineResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the engine is closed.
    fn delete(&mut self, key: &[u8], options: &WriteOptions) -> EngineResult<()>;

    /// Applies every staged operation of `batch` as one atomic unit.
    ///
    /// On error no operation of the batch is visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or the engine is closed.
    fn write(&mut self, batch: &WriteBatch, options: &WriteOptions) -> EngineResult<()>;

    /// Releases the engine's resources.
    ///
    /// # Errors
    ///
    /// Returns an error if shutdown fails or the engine is already closed.
    fn close(&mut self) -> EngineResult<()>;
}
