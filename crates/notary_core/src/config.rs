//! Store configuration.

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the store directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to error if the store directory already exists.
    pub error_if_exists: bool,

    /// Whether batch commits must be durable before returning.
    pub sync_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            error_if_exists: false,
            sync_writes: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the store if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to error if the store exists.
    #[must_use]
    pub const fn error_if_exists(mut self, value: bool) -> Self {
        self.error_if_exists = value;
        self
    }

    /// Sets whether commits are synced to disk.
    #[must_use]
    pub const fn sync_writes(mut self, value: bool) -> Self {
        self.sync_writes = value;
        self
    }

    /// Configuration that only attaches to an existing store.
    #[must_use]
    pub fn attach() -> Self {
        Self::default().create_if_missing(false)
    }

    /// Configuration that only creates a fresh store.
    #[must_use]
    pub fn create_new() -> Self {
        Self::default().error_if_exists(true)
    }
}
