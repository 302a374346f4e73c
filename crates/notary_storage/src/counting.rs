//! Call-recording engine wrapper.

use crate::backend::KvEngine;
use crate::batch::WriteBatch;
use crate::error::EngineResult;
use crate::options::{EngineOptions, WriteOptions};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counters shared between a [`CountingEngine`] and its observers.
///
/// Reads are bucketed by the first key byte, which lets callers that
/// prefix keys with a table tag count lookups per table.
#[derive(Debug, Default)]
pub struct CallCounts {
    gets: AtomicUsize,
    gets_by_prefix: Mutex<BTreeMap<u8, usize>>,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    writes: AtomicUsize,
    closes: AtomicUsize,
}

impl CallCounts {
    /// Total number of `get` calls.
    #[must_use]
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `get` calls whose key starts with `prefix`.
    #[must_use]
    pub fn gets_with_prefix(&self, prefix: u8) -> usize {
        self.gets_by_prefix.lock().get(&prefix).copied().unwrap_or(0)
    }

    /// Number of single-key `put` calls.
    #[must_use]
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of single-key `delete` calls.
    #[must_use]
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Number of batch `write` calls.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `close` calls.
    #[must_use]
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        self.gets.store(0, Ordering::SeqCst);
        self.gets_by_prefix.lock().clear();
        self.puts.store(0, Ordering::SeqCst);
        self.deletes.store(0, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
        self.closes.store(0, Ordering::SeqCst);
    }

    fn record_get(&self, key: &[u8]) {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(&prefix) = key.first() {
            *self.gets_by_prefix.lock().entry(prefix).or_insert(0) += 1;
        }
    }
}

/// An engine wrapper that counts every call before delegating.
///
/// # Example
///
/// ```rust
/// use notary_storage::{CountingEngine, InMemoryEngine, KvEngine};
///
/// let engine = CountingEngine::new(InMemoryEngine::new());
/// let counts = engine.counts();
/// engine.get(&[7, 1, 2]).unwrap();
/// assert_eq!(counts.gets_with_prefix(7), 1);
/// ```
#[derive(Debug)]
pub struct CountingEngine<E> {
    inner: E,
    counts: Arc<CallCounts>,
}

impl<E> CountingEngine<E> {
    /// Wraps `inner` with fresh counters.
    #[must_use]
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            counts: Arc::new(CallCounts::default()),
        }
    }

    /// Returns a handle to the counters.
    #[must_use]
    pub fn counts(&self) -> Arc<CallCounts> {
        Arc::clone(&self.counts)
    }

    /// Returns the wrapped engine.
    #[must_use]
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: KvEngine> KvEngine for CountingEngine<E> {
    fn open(path: &Path, options: &EngineOptions) -> EngineResult<Self> {
        E::open(path, options).map(Self::new)
    }

    fn get(&self, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        self.counts.record_get(key);
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8], options: &WriteOptions) -> EngineResult<()> {
        self.counts.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value, options)
    }

    fn delete(&mut self, key: &[u8], options: &WriteOptions) -> EngineResult<()> {
        self.counts.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key, options)
    }

    fn write(&mut self, batch: &WriteBatch, options: &WriteOptions) -> EngineResult<()> {
        self.counts.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(batch, options)
    }

    fn close(&mut self) -> EngineResult<()> {
        self.counts.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEngine;

    #[test]
    fn counts_gets_by_prefix() {
        let engine = CountingEngine::new(InMemoryEngine::new());
        let counts = engine.counts();

        engine.get(&[1, 0]).unwrap();
        engine.get(&[1, 5]).unwrap();
        engine.get(&[3]).unwrap();
        engine.get(&[]).unwrap();

        assert_eq!(counts.gets(), 4);
        assert_eq!(counts.gets_with_prefix(1), 2);
        assert_eq!(counts.gets_with_prefix(3), 1);
        assert_eq!(counts.gets_with_prefix(2), 0);
    }

    #[test]
    fn counts_writes_and_delegates() {
        let mut engine = CountingEngine::new(InMemoryEngine::new());
        let counts = engine.counts();
        let opts = WriteOptions::default();

        engine.put(b"a", b"1", &opts).unwrap();
        engine.delete(b"a", &opts).unwrap();

        let mut batch = WriteBatch::new();
        batch.stage_put(b"b".to_vec(), b"2".to_vec());
        batch.commit(&mut engine, &opts).unwrap();

        assert_eq!(counts.puts(), 1);
        assert_eq!(counts.deletes(), 1);
        assert_eq!(counts.writes(), 1);
        assert_eq!(engine.inner().get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn reset_clears_counters() {
        let mut engine = CountingEngine::new(InMemoryEngine::new());
        let counts = engine.counts();
        engine.get(&[9]).unwrap();
        engine.close().unwrap();

        assert_eq!(counts.closes(), 1);
        counts.reset();
        assert_eq!(counts.gets(), 0);
        assert_eq!(counts.gets_with_prefix(9), 0);
        assert_eq!(counts.closes(), 0);
    }
}
