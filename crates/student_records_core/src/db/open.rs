//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and the busy timeout.
//! - Ensure the student schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have the `students` table in place.
//! - Open failures on a file path surface as `DbError::StorageUnavailable`.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use crate::config::{StoreConfig, DEFAULT_BUSY_TIMEOUT};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens connections to one configured store file.
///
/// Holds configuration only; every `connect()` hands out a fresh connection
/// that the caller owns and closes by dropping.
#[derive(Debug, Clone)]
pub struct StorageGateway {
    config: StoreConfig,
}

impl StorageGateway {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a bootstrapped connection to the configured store.
    ///
    /// # Errors
    /// - `StorageUnavailable` when the file cannot be opened.
    /// - `UnsupportedSchemaVersion` / `Sqlite` when bootstrap fails.
    pub fn connect(&self) -> DbResult<Connection> {
        open_db_with(&self.config)
    }
}

/// Opens a SQLite database file with default settings, creating it if needed.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with(&StoreConfig::new(path.as_ref()))
}

/// Opens the store described by `config` and ensures its schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_with(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let mut flags = OpenFlags::default();
    if !config.create_if_missing {
        flags.remove(OpenFlags::SQLITE_OPEN_CREATE);
    }

    let conn = match Connection::open_with_flags(config.database_path(), flags) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=storage_unavailable error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(DbError::StorageUnavailable {
                path: config.database_path.clone(),
                source: err,
            });
        }
    };

    finish_open(conn, config.busy_timeout, "file", started_at)
}

/// Opens an in-memory SQLite database and ensures the student schema.
///
/// Every call yields an independent, empty store.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, DEFAULT_BUSY_TIMEOUT, "memory", started_at)
}

fn finish_open(
    mut conn: Connection,
    busy_timeout: Duration,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn, busy_timeout) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    ensure_schema(conn)?;
    Ok(())
}
