//! In-memory engine for testing.

use crate::backend::KvEngine;
use crate::batch::{BatchOp, WriteBatch};
use crate::error::{EngineError, EngineResult};
use crate::options::{EngineOptions, WriteOptions};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An in-memory ordered engine.
///
/// This engine keeps all data in a `BTreeMap` and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Clones share the same underlying map, so a test can keep a clone to
/// seed or inspect data after handing the engine to a store.
///
/// # Example
///
/// ```rust
/// use notary_storage::{InMemoryEngine, KvEngine, WriteOptions};
///
/// let mut engine = InMemoryEngine::new();
/// let observer = engine.clone();
/// engine.put(b"key", b"value", &WriteOptions::default()).unwrap();
/// assert_eq!(observer.get(b"key").unwrap(), Some(b"value".to_vec()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngine {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    closed: AtomicBool,
    fail_next_write: AtomicBool,
}

impl InMemoryEngine {
    /// Creates a new empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.data.read().len()
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.data.read().is_empty()
    }

    /// Returns all stored keys in ascending byte order.
    #[must_use]
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.shared.data.read().keys().cloned().collect()
    }

    /// Returns a copy of the whole keyspace.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.shared.data.read().clone()
    }

    /// Makes the next `put`, `delete`, or `write` fail without applying anything.
    pub fn fail_next_write(&self) {
        self.shared.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`KvEngine::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    fn check_open(&self) -> EngineResult<()> {
        if self.is_closed() {
            return Err(EngineError::Closed);
        }
        Ok(())
    }

    fn check_write(&self) -> EngineResult<()> {
        self.check_open()?;
        if self.shared.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(EngineError::WriteRejected("injected write failure".into()));
        }
        Ok(())
    }
}

impl KvEngine for InMemoryEngine {
    fn open(_path: &Path, _options: &EngineOptions) -> EngineResult<Self> {
        Ok(Self::new())
    }

    fn get(&self, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        self.check_open()?;
        Ok(self.shared.data.read().get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8], _options: &WriteOptions) -> EngineResult<()> {
        self.check_write()?;
        self.shared.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8], _options: &WriteOptions) -> EngineResult<()> {
        self.check_write()?;
        self.shared.data.write().remove(key);
        Ok(())
    }

    fn write(&mut self, batch: &WriteBatch, _options: &WriteOptions) -> EngineResult<()> {
        self.check_write()?;
        let mut data = self.shared.data.write();
        for op in batch.ops() {
            match op {
                BatchOp::Put { key, value } => {
                    data.insert(key.clone(), value.clone());
                }
                BatchOp::Delete { key } => {
                    data.remove(key);
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) -> EngineResult<()> {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return Err(EngineError::Closed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let engine = InMemoryEngine::new();
        assert!(engine.is_empty());
        assert_eq!(engine.get(b"missing").unwrap(), None);
    }

    #[test]
    fn memory_put_get_delete() {
        let mut engine = InMemoryEngine::new();
        let opts = WriteOptions::default();

        engine.put(b"k", b"v1", &opts).unwrap();
        assert_eq!(engine.get(b"k").unwrap(), Some(b"v1".to_vec()));

        engine.put(b"k", b"v2", &opts).unwrap();
        assert_eq!(engine.get(b"k").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(engine.len(), 1);

        engine.delete(b"k", &opts).unwrap();
        assert_eq!(engine.get(b"k").unwrap(), None);
    }

    #[test]
    fn memory_delete_absent_key_is_ok() {
        let mut engine = InMemoryEngine::new();
        assert!(engine.delete(b"nope", &WriteOptions::default()).is_ok());
    }

    #[test]
    fn memory_keys_are_sorted() {
        let mut engine = InMemoryEngine::new();
        let opts = WriteOptions::default();
        engine.put(&[2, 0], b"", &opts).unwrap();
        engine.put(&[1, 9], b"", &opts).unwrap();
        engine.put(&[1, 0, 0], b"", &opts).unwrap();

        assert_eq!(engine.keys(), vec![vec![1, 0, 0], vec![1, 9], vec![2, 0]]);
    }

    #[test]
    fn memory_clones_share_state() {
        let mut engine = InMemoryEngine::new();
        let observer = engine.clone();
        engine.put(b"k", b"v", &WriteOptions::default()).unwrap();
        assert_eq!(observer.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn memory_injected_failure_applies_once() {
        let mut engine = InMemoryEngine::new();
        let opts = WriteOptions::default();
        engine.fail_next_write();

        assert!(matches!(
            engine.put(b"k", b"v", &opts),
            Err(EngineError::WriteRejected(_))
        ));
        assert_eq!(engine.get(b"k").unwrap(), None);

        engine.put(b"k", b"v", &opts).unwrap();
        assert_eq!(engine.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn memory_closed_rejects_operations() {
        let mut engine = InMemoryEngine::new();
        engine.close().unwrap();

        assert!(engine.is_closed());
        assert!(matches!(engine.get(b"k"), Err(EngineError::Closed)));
        assert!(matches!(
            engine.put(b"k", b"v", &WriteOptions::default()),
            Err(EngineError::Closed)
        ));
        assert!(matches!(engine.close(), Err(EngineError::Closed)));
    }
}
