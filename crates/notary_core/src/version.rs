//! On-disk schema versions.
//!
//! Each supported version maps to a fixed set of engine options. Adding a
//! version means adding a variant and a row in [`SchemaVersion::engine_options`].

use crate::error::{CoreError, CoreResult};
use notary_storage::EngineOptions;
use std::fmt;

/// Raw marker value used when the marker file exists but cannot be read.
pub const UNREADABLE_VERSION: i32 = -1;

/// A schema revision this build can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// Stores created before the version marker carried tuning options.
    V0,
    /// Current schema.
    V1,
}

const V0_OPTIONS: EngineOptions = EngineOptions {
    block_cache_bytes: None,
    max_open_files: None,
    compression: true,
};

const V1_OPTIONS: EngineOptions = EngineOptions {
    block_cache_bytes: Some(8 * 1024 * 1024),
    max_open_files: Some(256),
    compression: false,
};

impl SchemaVersion {
    /// Version written for newly created stores.
    pub const CURRENT: Self = Self::V1;

    /// Every supported version.
    pub const ALL: [Self; 2] = [Self::V0, Self::V1];

    /// Returns the raw marker value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }

    /// Parses a raw marker value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedVersion`] for any value outside the
    /// supported set.
    pub fn from_i32(version: i32) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_i32() == version)
            .ok_or(CoreError::UnsupportedVersion { version })
    }

    /// Returns the engine options used to open a store of this version.
    #[must_use]
    pub const fn engine_options(self) -> EngineOptions {
        match self {
            Self::V0 => V0_OPTIONS,
            Self::V1 => V1_OPTIONS,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_versions_parse() {
        assert_eq!(SchemaVersion::from_i32(0).unwrap(), SchemaVersion::V0);
        assert_eq!(SchemaVersion::from_i32(1).unwrap(), SchemaVersion::V1);
    }

    #[test]
    fn unsupported_versions_fail() {
        for raw in [99, 2, UNREADABLE_VERSION, i32::MIN] {
            assert!(matches!(
                SchemaVersion::from_i32(raw),
                Err(CoreError::UnsupportedVersion { version }) if version == raw
            ));
        }
    }

    #[test]
    fn options_table() {
        assert_eq!(SchemaVersion::V0.engine_options(), EngineOptions::default());

        let v1 = SchemaVersion::V1.engine_options();
        assert!(v1.block_cache_bytes.is_some());
        assert_eq!(v1.max_open_files, Some(256));
        assert!(!v1.compression);
    }

    #[test]
    fn current_is_latest() {
        assert_eq!(SchemaVersion::CURRENT, *SchemaVersion::ALL.last().unwrap());
        assert_eq!(SchemaVersion::CURRENT.to_string(), "v1");
    }
}
