use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    // 1️⃣ configuration
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    info("Initializing rShift…");
    if !cli.test {
        info(format!("Config file : {}", Config::config_file().display()));
    }
    info(format!("Database    : {}", cfg.database));

    // 2️⃣ schema
    let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;
    init_db(&pool.conn)?;

    // 3️⃣ internal log (non blocking)
    if let Err(e) = ttlog(
        &pool.conn,
        "init",
        &cfg.database,
        "Database initialized",
    ) {
        log::warn!("failed to write internal log: {}", e);
    }

    success("rShift initialization completed!");
    Ok(())
}
