//! Audit trail table. Insert and select only.

use crate::errors::AppResult;
use crate::models::history::{EntityKind, HistoryAction, HistoryEntry};
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get("id")?,
        entity_kind: row.get("entity_kind")?,
        entity_id: row.get("entity_id")?,
        action: row.get("action")?,
        description: row.get("description")?,
        actor: row.get("actor")?,
        timestamp: row.get("timestamp")?,
    })
}

pub fn insert_entry(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    action: HistoryAction,
    description: &str,
    actor: &str,
    timestamp: &str,
) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO history (entity_kind, entity_id, action, description, actor, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    stmt.execute(params![
        kind.to_db_str(),
        entity_id,
        action.to_db_str(),
        description,
        actor,
        timestamp
    ])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_entries(
    conn: &Connection,
    kind: Option<EntityKind>,
    entity_id: Option<&str>,
) -> AppResult<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM history
         WHERE (?1 IS NULL OR entity_kind = ?1)
           AND (?2 IS NULL OR entity_id = ?2)
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![kind.map(|k| k.to_db_str()), entity_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
