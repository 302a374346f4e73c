//! Get command implementation.

use super::to_hex;
use notary_core::{Entry, Hash};
use serde::Serialize;
use std::path::Path;

/// Printable view of an entry.
#[derive(Debug, Serialize)]
pub struct EntryView {
    /// Entry hash.
    pub hash: String,
    /// Entry timestamp.
    pub timestamp: u64,
    /// External IDs (hex-encoded).
    pub ext_ids: Vec<String>,
    /// Payload (hex-encoded).
    pub data: String,
}

impl EntryView {
    fn new(hash: &Hash, entry: &Entry) -> Self {
        Self {
            hash: hash.to_string(),
            timestamp: entry.timestamp,
            ext_ids: entry.ext_ids.iter().map(|id| to_hex(id)).collect(),
            data: to_hex(&entry.data),
        }
    }
}

/// Loads an entry by hash.
pub fn load(path: &Path, hash: &str) -> Result<EntryView, Box<dyn std::error::Error>> {
    let hash = Hash::from_hex(hash)?;
    let db = super::attach(path)?;
    let entry = db.fetch_entry_by_hash(&hash)?;
    db.close()?;
    let entry = entry.ok_or_else(|| format!("No entry with hash {hash}"))?;
    Ok(EntryView::new(&hash, &entry))
}

/// Runs the get command.
pub fn run(path: &Path, hash: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let view = load(path, hash)?;
    match format {
        "json" => super::print_json(&view)?,
        _ => {
            println!("Hash:      {}", view.hash);
            println!("Timestamp: {}", view.timestamp);
            for ext_id in &view.ext_ids {
                println!("Ext ID:    {ext_id}");
            }
            println!("Data:      {}", view.data);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_inserted_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        super::super::init::run(&path).unwrap();
        let hash = super::super::put::insert(&path, &"02".repeat(32), "hi".into(), Vec::new(), Some(7))
            .unwrap();

        let view = load(&path, &hash.to_string()).unwrap();
        assert_eq!(view.timestamp, 7);
        assert_eq!(view.data, "6869");
    }

    #[test]
    fn get_reports_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        super::super::init::run(&path).unwrap();
        assert!(load(&path, &"00".repeat(32)).is_err());
    }
}
