//! Engine tuning and write options.

/// Tuning options applied when an engine is opened.
///
/// These are performance knobs, not correctness settings. Engines apply
/// the options they understand and ignore the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Size of the in-memory block cache, or `None` for the engine default.
    pub block_cache_bytes: Option<usize>,
    /// Upper bound on open file handles, or `None` for the engine default.
    pub max_open_files: Option<u32>,
    /// Whether stored blocks may be compressed.
    pub compression: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            block_cache_bytes: None,
            max_open_files: None,
            compression: true,
        }
    }
}

impl EngineOptions {
    /// Creates options that leave every setting at the engine default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block cache size in bytes.
    #[must_use]
    pub const fn block_cache_bytes(mut self, bytes: usize) -> Self {
        self.block_cache_bytes = Some(bytes);
        self
    }

    /// Sets the maximum number of open files.
    #[must_use]
    pub const fn max_open_files(mut self, count: u32) -> Self {
        self.max_open_files = Some(count);
        self
    }

    /// Enables or disables block compression.
    #[must_use]
    pub const fn compression(mut self, value: bool) -> Self {
        self.compression = value;
        self
    }
}

/// Options for a single write or batch commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Whether the write must be durable before the call returns.
    pub sync: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { sync: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_engine_defaults() {
        let opts = EngineOptions::default();
        assert_eq!(opts.block_cache_bytes, None);
        assert_eq!(opts.max_open_files, None);
        assert!(opts.compression);
    }

    #[test]
    fn builder_pattern() {
        let opts = EngineOptions::new()
            .block_cache_bytes(1024)
            .max_open_files(256)
            .compression(false);

        assert_eq!(opts.block_cache_bytes, Some(1024));
        assert_eq!(opts.max_open_files, Some(256));
        assert!(!opts.compression);
    }

    #[test]
    fn writes_are_durable_by_default() {
        assert!(WriteOptions::default().sync);
    }
}
