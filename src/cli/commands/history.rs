use super::{open_pool, print_json};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit::AuditTrail;
use crate::errors::AppResult;
use crate::models::history::EntityKind;
use crate::ui::messages::info;
use crate::utils::formatting::short_ts;
use crate::utils::table::Table;

/// `--entity attendance|task` filters by kind; any other value is an
/// entity id (a task id, or `EMP@YYYY-MM-DD` for an attendance day).
fn parse_filter(entity: Option<&str>) -> (Option<EntityKind>, Option<&str>) {
    match entity {
        None => (None, None),
        Some(e) => match EntityKind::from_db_str(e) {
            Some(kind) => (Some(kind), None),
            None => (None, Some(e)),
        },
    }
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::History { entity } = cmd {
        let pool = open_pool(cfg)?;
        let (kind, id) = parse_filter(entity.as_deref());
        let entries = AuditTrail::entries(&pool.conn, kind, id)?;

        if json {
            return print_json(&entries);
        }
        if entries.is_empty() {
            info("No history.");
            return Ok(());
        }

        let mut table = Table::new(vec!["WHEN", "ENTITY", "ACTION", "ACTOR", "DESCRIPTION"]);
        for h in &entries {
            table.add_row(vec![
                short_ts(&h.timestamp),
                format!("{}:{}", h.entity_kind, h.entity_id),
                h.action.clone(),
                h.actor.clone(),
                h.description.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
