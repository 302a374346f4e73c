//! Put command implementation.

use notary_core::{ChainId, Entry, Hash};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Inserts an entry and queues it for anchoring.
pub fn insert(
    path: &Path,
    chain: &str,
    data: String,
    ext_ids: Vec<String>,
    timestamp: Option<u64>,
) -> Result<Hash, Box<dyn std::error::Error>> {
    let chain_id = ChainId::from_hex(chain)?;
    let timestamp = match timestamp {
        Some(ts) => ts,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
    };

    let mut entry = Entry::new(timestamp, data.into_bytes());
    for ext_id in ext_ids {
        entry = entry.with_ext_id(ext_id.into_bytes());
    }

    let db = super::attach(path)?;
    let hash = db.insert_entry(&entry, &chain_id)?;
    db.close()?;
    tracing::debug!(%hash, %chain_id, timestamp, "entry queued");
    Ok(hash)
}

/// Runs the put command.
pub fn run(
    path: &Path,
    chain: &str,
    data: String,
    ext_ids: Vec<String>,
    timestamp: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let hash = insert(path, chain, data, ext_ids, timestamp)?;
    println!("{hash}");
    Ok(())
}
