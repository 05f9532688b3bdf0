//! rShift library root.
//! Time & attendance engine: attendance sessions, task timers, clock-out
//! reconciliation, timesheet ledger and audit trail over SQLite.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    use cli::commands as c;

    let json = cli.json;
    match &cli.command {
        Commands::Init => c::init::handle(cli),
        Commands::Config { .. } => c::config::handle(&cli.command, cfg),
        Commands::Db { .. } => c::db::handle(&cli.command, cfg),
        Commands::Log { .. } => c::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => c::backup::handle(&cli.command, cfg, json),
        Commands::Employee { .. } => c::employee::handle(&cli.command, cfg, json),
        Commands::Task { .. } => c::task::handle(&cli.command, cfg, json),
        Commands::In { .. } | Commands::Out { .. } | Commands::Status { .. } => {
            c::clock::handle(&cli.command, cfg, json)
        }
        Commands::Summary { .. } => c::summary::handle(&cli.command, cfg, json),
        Commands::Timer { .. } => c::timer::handle(&cli.command, cfg, json),
        Commands::Ledger { .. } => c::ledger::handle(&cli.command, cfg, json),
        Commands::History { .. } => c::history::handle(&cli.command, cfg, json),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ database override from the command line
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    cfg.database = utils::path::expand_tilde(&cfg.database)
        .to_string_lossy()
        .into_owned();

    // 4️⃣ diagnostics: RUST_LOG wins over the configured level
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cfg.log_level.as_str()),
    )
    .try_init();

    log::debug!("database: {}", cfg.database);

    // 5️⃣ dispatch
    dispatch(&cli, &cfg)
}
