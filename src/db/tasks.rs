use crate::errors::{AppError, AppResult};
use crate::models::task::Task;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        assigned_to: row.get("assigned_to")?,
        status: row.get("status")?,
        labels: row.get("labels")?,
        timer_started_at: row.get("timer_started_at")?,
        logged_seconds: row.get("logged_seconds")?,
    })
}

pub fn insert_task(conn: &Connection, title: &str, assigned_to: &str, labels: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tasks (title, assigned_to, labels) VALUES (?1, ?2, ?3)",
        params![title, assigned_to, labels],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_task(conn: &Connection, id: i64) -> AppResult<Option<Task>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM tasks WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get_task(conn: &Connection, id: i64) -> AppResult<Task> {
    find_task(conn, id)?.ok_or_else(|| AppError::not_found("Task", id))
}

pub fn list_tasks(conn: &Connection) -> AppResult<Vec<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every task with a running timer. Assignment matching happens in memory
/// because the assignment list is free text.
pub fn list_running(conn: &Connection) -> AppResult<Vec<Task>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM tasks WHERE timer_started_at IS NOT NULL ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Idle → Running. Only touches a task whose timer is currently NULL;
/// returns false if another writer got there first.
pub fn set_timer_started(conn: &Connection, id: i64, started_at: &str, status: &str) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE tasks SET timer_started_at = ?1, status = ?2
         WHERE id = ?3 AND timer_started_at IS NULL",
        params![started_at, status, id],
    )?;
    Ok(n == 1)
}

/// Running → Idle, adding `delta_seconds` to the cumulative total.
pub fn clear_timer(conn: &Connection, id: i64, delta_seconds: i64) -> AppResult<i64> {
    if delta_seconds < 0 {
        return Err(AppError::Other(format!(
            "refusing negative delta {} for task {}",
            delta_seconds, id
        )));
    }

    conn.execute(
        "UPDATE tasks
         SET timer_started_at = NULL, logged_seconds = logged_seconds + ?1
         WHERE id = ?2",
        params![delta_seconds, id],
    )?;

    let total: i64 = conn.query_row(
        "SELECT logged_seconds FROM tasks WHERE id = ?1",
        [id],
        |row| row.get(0),
    )?;
    Ok(total)
}

// ---------------------------
// Active timer pointer
// ---------------------------

/// Task id of the timer currently held by `employee_id`, if any.
pub fn active_timer_of(conn: &Connection, employee_id: &str) -> AppResult<Option<i64>> {
    let mut stmt =
        conn.prepare_cached("SELECT task_id FROM active_timers WHERE employee_id = ?1")?;
    Ok(stmt.query_row([employee_id], |row| row.get(0)).optional()?)
}

/// Claim the pointer for `employee_id`. The primary key rejects a second
/// claim, which surfaces as a constraint error.
pub fn claim_active_timer(
    conn: &Connection,
    employee_id: &str,
    task_id: i64,
    started_at: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO active_timers (employee_id, task_id, started_at) VALUES (?1, ?2, ?3)",
        params![employee_id, task_id, started_at],
    )?;
    Ok(())
}

pub fn release_active_timers_for_task(conn: &Connection, task_id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM active_timers WHERE task_id = ?1", [task_id])?)
}

pub fn release_active_timer_of(conn: &Connection, employee_id: &str) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM active_timers WHERE employee_id = ?1",
        [employee_id],
    )?)
}
