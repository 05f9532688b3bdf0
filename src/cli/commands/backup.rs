use super::{open_pool, print_json};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let mut pool = open_pool(cfg)?;
        let written = BackupLogic::backup(&mut pool, cfg, file, *compress, *force)?;

        if json {
            return print_json(&written);
        }
    }

    Ok(())
}
