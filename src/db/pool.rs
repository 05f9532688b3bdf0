//! SQLite connection wrapper (one connection per command handler).

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> AppResult<Self> {
        Self::with_timeout(path, DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn with_timeout(path: &str, busy_timeout_ms: u64) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::prepare(conn, busy_timeout_ms)
    }

    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn, DEFAULT_BUSY_TIMEOUT_MS)
    }

    fn prepare(conn: Connection, busy_timeout_ms: u64) -> AppResult<Self> {
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Run `func` inside `BEGIN IMMEDIATE … COMMIT`.
    ///
    /// The write lock is taken before the first read, so a check followed by
    /// a write inside `func` cannot interleave with another writer. Any error
    /// rolls the whole transaction back.
    pub fn immediate<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction) -> AppResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = func(&tx)?;
        tx.commit().map_err(AppError::from)?;
        Ok(out)
    }
}
