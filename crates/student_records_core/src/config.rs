//! Store configuration supplied at construction time.
//!
//! # Responsibility
//! - Carry the store location and per-connection settings into the gateway.
//!
//! # Invariants
//! - The core never resolves paths from the environment; callers decide.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings used by [`crate::db::StorageGateway`] for every connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the SQLite file holding the `students` table.
    pub database_path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// When `false`, a missing file is reported as unavailable instead of
    /// being created empty.
    pub create_if_missing: bool,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            create_if_missing: true,
        }
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn database_path(&self) -> &Path {
        self.database_path.as_path()
    }
}
