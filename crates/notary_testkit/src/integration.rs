//! Cross-crate integration test helpers.
//!
//! Provides a harness that mirrors every insert in a model so reads can
//! be checked against it, plus end-to-end tests over both engines.

use crate::seed::{seed_branch, SeedDepth};
use notary_core::{ChainId, CoreResult, EbInfo, Entry, EntryInfo, FbBatch, Hash, NotaryDb};
use notary_storage::InMemoryEngine;
use std::collections::HashMap;

/// A test harness for integration testing.
pub struct IntegrationHarness {
    /// The store instance.
    pub db: NotaryDb<InMemoryEngine>,
    engine: InMemoryEngine,
    entries: HashMap<Hash, (Entry, ChainId)>,
}

impl IntegrationHarness {
    /// Creates a new harness over an in-memory store.
    pub fn new() -> Self {
        let store = crate::fixtures::TestStore::memory();
        Self {
            db: store.db,
            engine: store.engine,
            entries: HashMap::new(),
        }
    }

    /// Inserts an entry and tracks it for later verification.
    pub fn insert(&mut self, entry: Entry, chain_id: ChainId) -> CoreResult<Hash> {
        let hash = self.db.insert_entry(&entry, &chain_id)?;
        self.entries.insert(hash, (entry, chain_id));
        Ok(hash)
    }

    /// Writes provenance records as the indexing stage would.
    pub fn index(
        &mut self,
        depth: SeedDepth,
        entry_info: &EntryInfo,
        eb_info: &EbInfo,
        batch: &FbBatch,
    ) {
        seed_branch(&mut self.engine, depth, entry_info, eb_info, batch)
            .expect("Failed to seed branch");
    }

    /// Checks every tracked entry and its queue marker.
    pub fn verify_all(&self) {
        for (hash, (entry, chain_id)) in &self.entries {
            let stored = self.db.fetch_entry_by_hash(hash).expect("Failed to fetch entry");
            assert_eq!(stored.as_ref(), Some(entry), "Entry mismatch for {hash}");

            let status = self
                .db
                .fetch_queue_status(chain_id, entry.timestamp, hash)
                .expect("Failed to fetch queue status");
            assert!(status.is_some(), "Missing queue marker for {hash}");
        }
    }

    /// Returns the number of tracked entries.
    pub fn tracked_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the underlying engine.
    pub fn engine(&self) -> &InMemoryEngine {
        &self.engine
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{filled_hash, sample_chain, sample_entry, FileStore};
    use crate::generators::*;
    use notary_core::keys::{self, Table};
    use notary_core::{Config, CoreError, QueueStatus, SchemaVersion};
    use notary_storage::{CountingEngine, RedbEngine};
    use proptest::prelude::*;

    #[test]
    fn harness_tracks_inserts() {
        let mut harness = IntegrationHarness::new();
        for n in 0..10 {
            harness.insert(sample_entry(n), sample_chain(n as u8 % 3)).unwrap();
        }
        assert_eq!(harness.tracked_count(), 10);
        assert_eq!(harness.engine().len(), 20);
        harness.verify_all();
    }

    #[test]
    fn failed_write_leaves_neither_record() {
        let harness = IntegrationHarness::new();
        let entry = sample_entry(1);
        let chain = sample_chain(1);

        harness.engine().fail_next_write();
        assert!(harness.db.insert_entry(&entry, &chain).is_err());

        let hash = entry.hash().unwrap();
        assert!(harness.engine().is_empty());
        assert_eq!(harness.db.fetch_entry_by_hash(&hash).unwrap(), None);
        assert_eq!(
            harness.db.fetch_queue_status(&chain, entry.timestamp, &hash).unwrap(),
            None
        );

        harness.db.insert_entry(&entry, &chain).unwrap();
        assert_eq!(
            harness.db.fetch_queue_status(&chain, entry.timestamp, &hash).unwrap(),
            Some(QueueStatus::InQueue)
        );
    }

    #[test]
    fn absent_records_are_none() {
        let harness = IntegrationHarness::new();
        let hash = filled_hash(0x42);
        assert_eq!(harness.db.fetch_entry_by_hash(&hash).unwrap(), None);
        assert_eq!(harness.db.fetch_entry_info_by_hash(&hash).unwrap(), None);
        assert_eq!(harness.db.fetch_eb_info_by_hash(&hash).unwrap(), None);
        assert_eq!(harness.db.fetch_fb_batch_by_hash(&hash).unwrap(), None);

        let branch = harness.db.fetch_entry_info_branch_by_hash(&hash).unwrap();
        assert_eq!(branch.entry_hash, hash);
        assert!(branch.entry_info.is_none());
    }

    #[test]
    fn unsupported_marker_rejects_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        NotaryDb::<RedbEngine>::open(&path, Config::create_new())
            .unwrap()
            .close()
            .unwrap();

        std::fs::write(dir.path().join("store.ver"), 2i32.to_le_bytes()).unwrap();
        let err = NotaryDb::<RedbEngine>::open(&path, Config::attach()).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedVersion { version: 2 }));
    }

    #[test]
    fn new_store_writes_current_marker() {
        let store = FileStore::create();
        assert_eq!(store.schema_version(), SchemaVersion::CURRENT);
        let marker = std::fs::read(notary_core::StoreDir::new(&store.path()).marker_path()).unwrap();
        assert_eq!(marker, SchemaVersion::CURRENT.as_i32().to_le_bytes());
    }

    #[test]
    fn branch_stops_at_first_missing_link() {
        let engine = InMemoryEngine::new();
        let counting = CountingEngine::new(engine.clone());
        let counts = counting.counts();
        let db = NotaryDb::with_engine(counting, Config::default());

        let entry_info = EntryInfo {
            entry_hash: filled_hash(1),
            eb_hash: filled_hash(2),
            eb_block_num: 7,
            entry_index: 0,
        };
        let eb_info = EbInfo {
            eb_hash: filled_hash(2),
            merkle_root: filled_hash(3),
            fb_hash: filled_hash(4),
            fb_block_num: 9,
            chain_id: sample_chain(1),
        };
        let batch = FbBatch {
            fb_hashes: vec![filled_hash(4)],
            ..FbBatch::default()
        };

        let mut seeder = engine.clone();
        seed_branch(&mut seeder, SeedDepth::EntryInfo, &entry_info, &eb_info, &batch).unwrap();

        let branch = db.fetch_entry_info_branch_by_hash(&filled_hash(1)).unwrap();
        assert_eq!(branch.entry_info, Some(entry_info.clone()));
        assert_eq!(branch.eb_info, None);
        assert_eq!(branch.fb_batch, None);
        assert_eq!(counts.gets_with_prefix(Table::EntryInfo.tag()), 1);
        assert_eq!(counts.gets_with_prefix(Table::EbInfo.tag()), 1);
        assert_eq!(counts.gets_with_prefix(Table::FbBatch.tag()), 0);

        counts.reset();
        seed_branch(&mut seeder, SeedDepth::Full, &entry_info, &eb_info, &batch).unwrap();
        let branch = db.fetch_entry_info_branch_by_hash(&filled_hash(1)).unwrap();
        assert!(branch.is_complete());
        assert_eq!(branch.fb_batch, Some(batch));
        assert_eq!(counts.gets(), 3);
    }

    #[test]
    fn branch_survives_reopen() {
        let store = FileStore::create();
        let hash = store.insert_entry(&sample_entry(3), &sample_chain(3)).unwrap();
        let store = store.reopen();
        let branch = store.fetch_entry_info_branch_by_hash(&hash).unwrap();
        assert!(branch.entry_info.is_none());
        assert!(store.fetch_entry_by_hash(&hash).unwrap().is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn inserted_entries_read_back(entries in prop::collection::vec(entry_strategy(), 1..16), chain in chain_id_strategy()) {
            let mut harness = IntegrationHarness::new();
            for entry in entries {
                harness.insert(entry, chain).unwrap();
            }
            harness.verify_all();
        }

        #[test]
        fn queue_keys_sort_by_chain_then_time(
            timestamps in ascending_timestamps_strategy(12),
            chain in chain_id_strategy(),
        ) {
            let harness = IntegrationHarness::new();
            for (n, ts) in timestamps.iter().enumerate() {
                let entry = Entry::new(*ts, vec![n as u8]);
                harness.db.insert_entry(&entry, &chain).unwrap();
            }

            let prefix = keys::entry_queue_prefix(&chain);
            let queued: Vec<u64> = harness
                .engine()
                .keys()
                .into_iter()
                .filter(|key| key.starts_with(&prefix))
                .map(|key| u64::from_be_bytes(key[33..41].try_into().unwrap()))
                .collect();
            prop_assert_eq!(queued, timestamps);
        }

        #[test]
        fn seeded_branches_resolve(
            (entry_info, eb_info, batch) in linked_branch_strategy()
        ) {
            let mut harness = IntegrationHarness::new();
            harness.index(SeedDepth::Full, &entry_info, &eb_info, &batch);
            let branch = harness
                .db
                .fetch_entry_info_branch_by_hash(&entry_info.entry_hash)
                .unwrap();
            prop_assert_eq!(branch.entry_info, Some(entry_info));
            prop_assert_eq!(branch.eb_info, Some(eb_info));
            prop_assert_eq!(branch.fb_batch, Some(batch));
        }
    }
}
