//! Audit Trail: one human-readable history row per state transition.

use crate::core::clock::LocalTimestamp;
use crate::db::history;
use crate::errors::AppResult;
use crate::models::history::{EntityKind, HistoryAction, HistoryEntry};
use rusqlite::Connection;

/// Actor recorded for transitions the engine performs on its own.
pub const SYSTEM_ACTOR: &str = "system";

pub struct AuditTrail;

impl AuditTrail {
    pub fn record(
        conn: &Connection,
        kind: EntityKind,
        entity_id: &str,
        action: HistoryAction,
        description: &str,
        actor: &str,
        at: &LocalTimestamp,
    ) -> AppResult<i64> {
        log::debug!(
            "audit {} {} {}: {}",
            kind.to_db_str(),
            entity_id,
            action.to_db_str(),
            description
        );
        history::insert_entry(
            conn,
            kind,
            entity_id,
            action,
            description,
            actor,
            &at.to_db_string(),
        )
    }

    pub fn entries(
        conn: &Connection,
        kind: Option<EntityKind>,
        entity_id: Option<&str>,
    ) -> AppResult<Vec<HistoryEntry>> {
        history::list_entries(conn, kind, entity_id)
    }
}
