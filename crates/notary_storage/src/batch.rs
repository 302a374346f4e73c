//! Atomic write batches.

use crate::backend::KvEngine;
use crate::error::EngineResult;
use crate::options::WriteOptions;

/// A single staged batch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Store `value` under `key`.
    Put {
        /// Target key.
        key: Vec<u8>,
        /// Value to store.
        value: Vec<u8>,
    },
    /// Remove `key`.
    Delete {
        /// Target key.
        key: Vec<u8>,
    },
}

impl BatchOp {
    /// Returns the key this operation targets.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// A reusable buffer of put/delete operations committed as one unit.
///
/// Staging never touches the engine. [`WriteBatch::commit`] hands all
/// staged operations to [`KvEngine::write`] and then clears the buffer,
/// whether or not the engine accepted them. A failed commit is never
/// retried; the caller gets the engine's error.
///
/// A batch does no locking of its own. Callers that share one batch
/// must serialize access to it.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a put of `value` under `key`.
    pub fn stage_put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.ops.push(BatchOp::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Stages a delete of `key`.
    pub fn stage_delete(&mut self, key: impl Into<Vec<u8>>) {
        self.ops.push(BatchOp::Delete { key: key.into() });
    }

    /// Returns the staged operations in staging order.
    #[must_use]
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Returns the number of staged operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Discards all staged operations.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Commits the staged operations to `engine` as one atomic unit.
    ///
    /// The buffer is cleared on both success and failure.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged if the commit fails.
    pub fn commit<E>(&mut self, engine: &mut E, options: &WriteOptions) -> EngineResult<()>
    where
        E: KvEngine + ?Sized,
    {
        let result = engine.write(self, options);
        match &result {
            Ok(()) => tracing::trace!(ops = self.ops.len(), "batch committed"),
            Err(err) => tracing::warn!(ops = self.ops.len(), error = %err, "batch failed"),
        }
        self.ops.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEngine;

    #[test]
    fn staging_does_not_touch_engine() {
        let engine = InMemoryEngine::new();
        let mut batch = WriteBatch::new();
        batch.stage_put(b"k".to_vec(), b"v".to_vec());

        assert_eq!(batch.len(), 1);
        assert_eq!(engine.get(b"k").unwrap(), None);
    }

    #[test]
    fn commit_applies_all_and_clears() {
        let mut engine = InMemoryEngine::new();
        let mut batch = WriteBatch::new();
        batch.stage_put(b"a".to_vec(), b"1".to_vec());
        batch.stage_put(b"b".to_vec(), b"2".to_vec());

        batch.commit(&mut engine, &WriteOptions::default()).unwrap();

        assert!(batch.is_empty());
        assert_eq!(engine.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(engine.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn commit_applies_ops_in_order() {
        let mut engine = InMemoryEngine::new();
        let mut batch = WriteBatch::new();
        batch.stage_put(b"a".to_vec(), b"1".to_vec());
        batch.stage_delete(b"a".to_vec());
        batch.stage_put(b"b".to_vec(), b"2".to_vec());
        batch.stage_put(b"b".to_vec(), b"3".to_vec());

        batch.commit(&mut engine, &WriteOptions::default()).unwrap();

        assert_eq!(engine.get(b"a").unwrap(), None);
        assert_eq!(engine.get(b"b").unwrap(), Some(b"3".to_vec()));
    }

    #[test]
    fn failed_commit_clears_and_leaves_engine_untouched() {
        let mut engine = InMemoryEngine::new();
        engine.fail_next_write();

        let mut batch = WriteBatch::new();
        batch.stage_put(b"a".to_vec(), b"1".to_vec());
        batch.stage_put(b"b".to_vec(), b"2".to_vec());

        let result = batch.commit(&mut engine, &WriteOptions::default());
        assert!(result.is_err());
        assert!(batch.is_empty());
        assert_eq!(engine.get(b"a").unwrap(), None);
        assert_eq!(engine.get(b"b").unwrap(), None);
    }

    #[test]
    fn batch_is_reusable_after_commit() {
        let mut engine = InMemoryEngine::new();
        let mut batch = WriteBatch::new();

        batch.stage_put(b"a".to_vec(), b"1".to_vec());
        batch.commit(&mut engine, &WriteOptions::default()).unwrap();

        batch.stage_put(b"b".to_vec(), b"2".to_vec());
        assert_eq!(batch.len(), 1);
        batch.commit(&mut engine, &WriteOptions::default()).unwrap();

        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn op_key_accessor() {
        let put = BatchOp::Put {
            key: b"p".to_vec(),
            value: Vec::new(),
        };
        let del = BatchOp::Delete { key: b"d".to_vec() };
        assert_eq!(put.key(), b"p");
        assert_eq!(del.key(), b"d");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeMap;

        fn op_strategy() -> impl Strategy<Value = (bool, Vec<u8>, Vec<u8>)> {
            (
                any::<bool>(),
                prop::collection::vec(0u8..4, 1..3),
                prop::collection::vec(any::<u8>(), 0..8),
            )
        }

        proptest! {
            #[test]
            fn batch_matches_sequential_model(ops in prop::collection::vec(op_strategy(), 0..32)) {
                let mut engine = InMemoryEngine::new();
                let mut model = BTreeMap::new();
                let mut batch = WriteBatch::new();

                for (is_put, key, value) in ops {
                    if is_put {
                        model.insert(key.clone(), value.clone());
                        batch.stage_put(key, value);
                    } else {
                        model.remove(&key);
                        batch.stage_delete(key);
                    }
                }

                batch.commit(&mut engine, &WriteOptions::default()).unwrap();
                prop_assert_eq!(engine.snapshot(), model);
            }
        }
    }
}
