pub mod backup;
pub mod clock;
pub mod config;
pub mod db;
pub mod employee;
pub mod history;
pub mod init;
pub mod ledger;
pub mod log;
pub mod summary;
pub mod task;
pub mod timer;

use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use serde::Serialize;

/// Open the configured database with pending migrations applied.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

pub(crate) fn system_clock(cfg: &Config) -> AppResult<SystemClock> {
    Ok(SystemClock::new(cfg.zone()?))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
