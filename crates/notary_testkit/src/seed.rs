//! Seeding helpers for provenance records.
//!
//! NotaryDB only reads entry-info, entry-block and batch records; they
//! are written by the indexing stage that runs after anchoring. These
//! helpers write them straight into an engine so tests can exercise
//! branch resolution.

use notary_core::keys;
use notary_core::{BinaryCodec, CoreResult, EbInfo, EntryInfo, FbBatch};
use notary_storage::{KvEngine, WriteBatch, WriteOptions};

/// How much of a provenance chain to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedDepth {
    /// Write nothing.
    None,
    /// Write only the entry info.
    EntryInfo,
    /// Write the entry info and entry-block info.
    EbInfo,
    /// Write every link.
    Full,
}

/// Writes an entry info under its entry hash.
pub fn seed_entry_info<E: KvEngine + ?Sized>(engine: &mut E, info: &EntryInfo) -> CoreResult<()> {
    engine.put(
        &keys::entry_info_key(&info.entry_hash),
        &info.marshal_binary()?,
        &WriteOptions::default(),
    )?;
    Ok(())
}

/// Writes an entry-block info under its entry-block hash.
pub fn seed_eb_info<E: KvEngine + ?Sized>(engine: &mut E, info: &EbInfo) -> CoreResult<()> {
    engine.put(
        &keys::eb_info_key(&info.eb_hash),
        &info.marshal_binary()?,
        &WriteOptions::default(),
    )?;
    Ok(())
}

/// Writes a batch under every federated-block hash it covers.
pub fn seed_fb_batch<E: KvEngine + ?Sized>(engine: &mut E, batch: &FbBatch) -> CoreResult<()> {
    let value = batch.marshal_binary()?;
    let mut writes = WriteBatch::new();
    for fb_hash in &batch.fb_hashes {
        writes.stage_put(keys::fb_batch_key(fb_hash), value.clone());
    }
    writes.commit(engine, &WriteOptions::default())?;
    Ok(())
}

/// Writes the links of a provenance chain up to `depth`.
pub fn seed_branch<E: KvEngine + ?Sized>(
    engine: &mut E,
    depth: SeedDepth,
    entry_info: &EntryInfo,
    eb_info: &EbInfo,
    batch: &FbBatch,
) -> CoreResult<()> {
    if depth == SeedDepth::None {
        return Ok(());
    }
    seed_entry_info(engine, entry_info)?;
    if depth == SeedDepth::EntryInfo {
        return Ok(());
    }
    seed_eb_info(engine, eb_info)?;
    if depth == SeedDepth::EbInfo {
        return Ok(());
    }
    seed_fb_batch(engine, batch)
}
