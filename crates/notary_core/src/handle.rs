//! Guarded engine handle.

use crate::error::{CoreError, CoreResult};
use notary_storage::{KvEngine, WriteBatch, WriteOptions};
use parking_lot::Mutex;

/// Owns an open engine and the one lock that serializes every operation on it.
///
/// All reads, batch commits, barriers, and shutdown take the same mutex
/// for their full duration. There is no reader/writer split; the engine
/// and the reusable [`WriteBatch`] are the only shared state.
#[derive(Debug)]
pub struct StoreHandle<E> {
    state: Mutex<HandleState<E>>,
    write_options: WriteOptions,
}

#[derive(Debug)]
struct HandleState<E> {
    /// `None` once the handle has been closed.
    engine: Option<E>,
    batch: WriteBatch,
}

impl<E: KvEngine> StoreHandle<E> {
    /// Wraps an open engine.
    pub fn new(engine: E, write_options: WriteOptions) -> Self {
        Self {
            state: Mutex::new(HandleState {
                engine: Some(engine),
                batch: WriteBatch::new(),
            }),
            write_options,
        }
    }

    /// Runs `f` against the engine while holding the lock.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DatabaseClosed`] after [`StoreHandle::close`],
    /// otherwise whatever `f` returns.
    pub fn read<T>(&self, f: impl FnOnce(&E) -> CoreResult<T>) -> CoreResult<T> {
        let state = self.state.lock();
        let engine = state.engine.as_ref().ok_or(CoreError::DatabaseClosed)?;
        f(engine)
    }

    /// Stages operations with `stage` and commits them as one atomic batch.
    ///
    /// The lock is held from staging through commit. The shared batch is
    /// empty again when this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DatabaseClosed`] after close, or the engine's
    /// commit error.
    pub fn commit(&self, stage: impl FnOnce(&mut WriteBatch)) -> CoreResult<()> {
        let mut guard = self.state.lock();
        let HandleState { engine, batch } = &mut *guard;
        let engine = engine.as_mut().ok_or(CoreError::DatabaseClosed)?;

        batch.clear();
        stage(batch);
        batch.commit(engine, &self.write_options)?;
        Ok(())
    }

    /// Waits for any in-flight operation to finish. Performs no I/O.
    pub fn barrier(&self) {
        drop(self.state.lock());
    }

    /// Returns true until the handle is closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.lock().engine.is_some()
    }

    /// Closes the engine.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DatabaseClosed`] if already closed, or the
    /// engine's shutdown error.
    pub fn close(&self) -> CoreResult<()> {
        let mut state = self.state.lock();
        let mut engine = state.engine.take().ok_or(CoreError::DatabaseClosed)?;
        state.batch.clear();
        engine.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notary_storage::InMemoryEngine;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn commit_and_read() {
        let handle = StoreHandle::new(InMemoryEngine::new(), WriteOptions::default());
        handle
            .commit(|batch| {
                batch.stage_put(b"a".to_vec(), b"1".to_vec());
                batch.stage_put(b"b".to_vec(), b"2".to_vec());
            })
            .unwrap();

        let value = handle.read(|engine| Ok(engine.get(b"b")?)).unwrap();
        assert_eq!(value, Some(b"2".to_vec()));
    }

    #[test]
    fn failed_commit_leaves_no_state() {
        let engine = InMemoryEngine::new();
        let observer = engine.clone();
        let handle = StoreHandle::new(engine, WriteOptions::default());

        observer.fail_next_write();
        let result = handle.commit(|batch| batch.stage_put(b"a".to_vec(), b"1".to_vec()));
        assert!(matches!(result, Err(CoreError::Engine(_))));
        assert!(observer.is_empty());

        // Nothing from the failed batch leaks into the next one.
        handle
            .commit(|batch| batch.stage_put(b"b".to_vec(), b"2".to_vec()))
            .unwrap();
        assert_eq!(observer.keys(), vec![b"b".to_vec()]);
    }

    #[test]
    fn close_then_operations_fail() {
        let engine = InMemoryEngine::new();
        let observer = engine.clone();
        let handle = StoreHandle::new(engine, WriteOptions::default());

        handle.close().unwrap();
        assert!(observer.is_closed());
        assert!(!handle.is_open());
        assert!(matches!(
            handle.read(|engine| Ok(engine.get(b"a")?)),
            Err(CoreError::DatabaseClosed)
        ));
        assert!(matches!(
            handle.commit(|_| {}),
            Err(CoreError::DatabaseClosed)
        ));
        assert!(matches!(handle.close(), Err(CoreError::DatabaseClosed)));
    }

    #[test]
    fn concurrent_commits_are_serialized() {
        let engine = InMemoryEngine::new();
        let observer = engine.clone();
        let handle = Arc::new(StoreHandle::new(engine, WriteOptions::default()));

        let workers: Vec<_> = (0u8..8)
            .map(|t| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || {
                    for i in 0u8..25 {
                        handle
                            .commit(|batch| {
                                batch.stage_put(vec![t, i, 0], vec![i]);
                                batch.stage_put(vec![t, i, 1], vec![i]);
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        handle.barrier();
        assert_eq!(observer.len(), 8 * 25 * 2);
    }
}
