//! Init command implementation.

use notary_core::{Config, NotaryDb};
use notary_storage::RedbEngine;
use std::path::Path;

/// Runs the init command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let db = NotaryDb::<RedbEngine>::open(path, Config::create_new())?;
    println!(
        "Created store at {} (schema {})",
        path.display(),
        db.schema_version()
    );
    db.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_refuses_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        run(&path).unwrap();
        assert!(path.join(notary_storage::DATA_FILE).exists());
        assert!(run(&path).is_err());
    }
}
