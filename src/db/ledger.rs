//! Timesheet ledger table. Insert and select only.

use crate::errors::AppResult;
use crate::models::timesheet::{NewTimesheetEntry, TimesheetEntry};
use rusqlite::{Connection, Result, Row, ToSql, params, params_from_iter};

pub fn map_row(row: &Row) -> Result<TimesheetEntry> {
    Ok(TimesheetEntry {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        employee_id: row.get("employee_id")?,
        employee_name: row.get("employee_name")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        duration_seconds: row.get("duration_seconds")?,
        memo: row.get("memo")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_entry(conn: &Connection, e: &NewTimesheetEntry, created_at: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO timesheet (task_id, employee_id, employee_name, start_time, end_time,
                                duration_seconds, memo, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            e.task_id,
            e.employee_id,
            e.employee_name,
            e.start_time,
            e.end_time,
            e.duration_seconds,
            e.memo,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Entries filtered by task and/or employee, in insertion order.
pub fn list_entries(
    conn: &Connection,
    task_id: Option<i64>,
    employee_id: Option<&str>,
) -> AppResult<Vec<TimesheetEntry>> {
    let mut sql = String::from("SELECT * FROM timesheet WHERE 1 = 1");
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(t) = task_id {
        sql.push_str(" AND task_id = ?");
        args.push(Box::new(t));
    }
    if let Some(e) = employee_id {
        sql.push_str(" AND employee_id = ?");
        args.push(Box::new(e.to_string()));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter().map(|b| b.as_ref())), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn total_seconds_for_task(conn: &Connection, task_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT IFNULL(SUM(duration_seconds), 0) FROM timesheet WHERE task_id = ?1",
        [task_id],
        |row| row.get(0),
    )?)
}
