//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records whose links
//! are internally consistent.

use notary_core::{ChainId, EbInfo, Entry, EntryInfo, FbBatch, Hash};
use proptest::prelude::*;

/// Strategy for generating arbitrary hashes.
pub fn hash_strategy() -> impl Strategy<Value = Hash> {
    prop::array::uniform32(any::<u8>()).prop_map(Hash::from_bytes)
}

/// Strategy for generating arbitrary chain IDs.
pub fn chain_id_strategy() -> impl Strategy<Value = ChainId> {
    prop::array::uniform32(any::<u8>()).prop_map(ChainId::from_bytes)
}

/// Strategy for generating entry payloads.
pub fn entry_data_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Strategy for generating entries with up to four external IDs.
pub fn entry_strategy() -> impl Strategy<Value = Entry> {
    (
        any::<u64>(),
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..4),
        entry_data_strategy(),
    )
        .prop_map(|(timestamp, ext_ids, data)| Entry {
            timestamp,
            ext_ids,
            data,
        })
}

/// Strategy for generating entry-block locations.
pub fn entry_info_strategy() -> impl Strategy<Value = EntryInfo> {
    (hash_strategy(), hash_strategy(), any::<u64>(), any::<u32>()).prop_map(
        |(entry_hash, eb_hash, eb_block_num, entry_index)| EntryInfo {
            entry_hash,
            eb_hash,
            eb_block_num,
            entry_index,
        },
    )
}

/// Strategy for generating federated-block locations.
pub fn eb_info_strategy() -> impl Strategy<Value = EbInfo> {
    (
        hash_strategy(),
        hash_strategy(),
        hash_strategy(),
        any::<u64>(),
        chain_id_strategy(),
    )
        .prop_map(
            |(eb_hash, merkle_root, fb_hash, fb_block_num, chain_id)| EbInfo {
                eb_hash,
                merkle_root,
                fb_hash,
                fb_block_num,
                chain_id,
            },
        )
}

/// Strategy for generating anchoring batches of up to eight blocks.
pub fn fb_batch_strategy() -> impl Strategy<Value = FbBatch> {
    (
        prop::collection::vec(hash_strategy(), 0..8),
        hash_strategy(),
        hash_strategy(),
        any::<u32>(),
        any::<u32>(),
        hash_strategy(),
    )
        .prop_map(
            |(fb_hashes, merkle_root, btc_tx_hash, btc_tx_offset, btc_block_height, btc_block_hash)| {
                FbBatch {
                    fb_hashes,
                    merkle_root,
                    btc_tx_hash,
                    btc_tx_offset,
                    btc_block_height,
                    btc_block_hash,
                }
            },
        )
}

/// Strategy for generating a fully linked provenance chain for an entry.
///
/// The entry info points at the eb info, which points at the batch.
pub fn linked_branch_strategy() -> impl Strategy<Value = (EntryInfo, EbInfo, FbBatch)> {
    (entry_info_strategy(), eb_info_strategy(), fb_batch_strategy()).prop_map(
        |(entry_info, mut eb_info, mut batch)| {
            eb_info.eb_hash = entry_info.eb_hash;
            if !batch.fb_hashes.contains(&eb_info.fb_hash) {
                batch.fb_hashes.push(eb_info.fb_hash);
            }
            (entry_info, eb_info, batch)
        },
    )
}

/// Strategy for generating a sequence of timestamps in ascending order.
pub fn ascending_timestamps_strategy(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::btree_set(any::<u64>(), 1..=max_len).prop_map(|set| set.into_iter().collect())
}
