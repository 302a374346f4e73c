//! Store directory and version marker management.
//!
//! A store occupies a directory owned by the engine plus a sibling
//! version marker:
//!
//! ```text
//! <path>/        # engine data
//! <path>.ver     # schema version, i32 little-endian
//! ```
//!
//! The marker lives outside the engine directory so the version can be
//! checked before the engine is touched.

use crate::error::{CoreError, CoreResult};
use crate::version::{SchemaVersion, UNREADABLE_VERSION};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the store path to name the version marker.
pub const MARKER_SUFFIX: &str = ".ver";

/// Suffix of the temporary file used for atomic marker writes.
const MARKER_TEMP_SUFFIX: &str = ".ver.tmp";

/// Filesystem layout of one store.
#[derive(Debug, Clone)]
pub struct StoreDir {
    path: PathBuf,
}

impl StoreDir {
    /// Creates a layout rooted at `path`. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the version marker.
    #[must_use]
    pub fn marker_path(&self) -> PathBuf {
        self.sibling(MARKER_SUFFIX)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Ensures the store directory exists.
    ///
    /// Returns `true` if this call created it. Creation is a single
    /// non-recursive `mkdir`, so when several callers race exactly one
    /// sees `true`. The parent directory must already exist.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the directory is missing and
    ///   `create_if_missing` is false
    /// - [`CoreError::AlreadyExists`] if it exists and `error_if_exists` is true
    /// - [`CoreError::Io`] if the path is not a directory or creation fails
    pub fn prepare(&self, create_if_missing: bool, error_if_exists: bool) -> CoreResult<bool> {
        if create_if_missing {
            match create_store_dir(&self.path) {
                Ok(()) => return Ok(true),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
                Err(err) => return Err(err.into()),
            }
        } else if !self.path.exists() {
            return Err(CoreError::NotFound {
                path: self.path.clone(),
            });
        }

        if error_if_exists {
            return Err(CoreError::AlreadyExists {
                path: self.path.clone(),
            });
        }
        if !self.path.is_dir() {
            return Err(CoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("store path is not a directory: {}", self.path.display()),
            )));
        }
        Ok(false)
    }

    /// Reads the raw version marker.
    ///
    /// Returns `None` if there is no marker. A marker shorter than four
    /// bytes reads as [`UNREADABLE_VERSION`].
    pub fn load_version(&self) -> CoreResult<Option<i32>> {
        let mut file = match File::open(self.marker_path()) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut buf = [0u8; 4];
        match file.read_exact(&mut buf) {
            Ok(()) => Ok(Some(i32::from_le_bytes(buf))),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Ok(Some(UNREADABLE_VERSION))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Writes the version marker durably.
    ///
    /// Uses write-then-rename so a crash never leaves a torn marker:
    /// 1. Write to a temporary file
    /// 2. Sync the temporary file
    /// 3. Rename it over the marker
    /// 4. Fsync the parent directory
    pub fn save_version(&self, version: SchemaVersion) -> CoreResult<()> {
        let marker = self.marker_path();
        let temp = self.sibling(MARKER_TEMP_SUFFIX);

        let mut file = File::create(&temp)?;
        file.write_all(&version.as_i32().to_le_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &marker)?;
        self.sync_parent()?;

        tracing::debug!(marker = %marker.display(), %version, "version marker written");
        Ok(())
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> CoreResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> CoreResult<()> {
        // NTFS journaling covers rename durability
        Ok(())
    }
}

#[cfg(unix)]
fn create_store_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(0o750).create(path)
}

#[cfg(not(unix))]
fn create_store_dir(path: &Path) -> io::Result<()> {
    fs::create_dir(path)
}
