use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceSession};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<AttendanceRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date,
        clock_in: row.get("clock_in")?,
        clock_out: row.get("clock_out")?,
        duration_seconds: row.get("duration_seconds")?,
        hours_worked: row.get("hours_worked")?,
        session_count: row.get("session_count")?,
    })
}

fn map_session(row: &Row) -> Result<AttendanceSession> {
    Ok(AttendanceSession {
        id: row.get("id")?,
        attendance_id: row.get("attendance_id")?,
        employee_id: row.get("employee_id")?,
        session_no: row.get("session_no")?,
        clock_in: row.get("clock_in")?,
        clock_out: row.get("clock_out")?,
        duration_seconds: row.get("duration_seconds")?,
    })
}

fn date_key(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn find_for_day(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance WHERE employee_id = ?1 AND date = ?2",
    )?;
    Ok(stmt
        .query_row(params![employee_id, date_key(date)], map_row)
        .optional()?)
}

/// Most recent open record of the employee, any day.
pub fn latest_open(conn: &Connection, employee_id: &str) -> AppResult<Option<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance
         WHERE employee_id = ?1 AND clock_out IS NULL
         ORDER BY date DESC
         LIMIT 1",
    )?;
    Ok(stmt.query_row([employee_id], map_row).optional()?)
}

pub fn insert_record(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
    clock_in: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance (employee_id, date, clock_in, clock_out, duration_seconds, hours_worked, session_count)
         VALUES (?1, ?2, ?3, NULL, 0, 0, 1)",
        params![employee_id, date_key(date), clock_in],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Reopen a closed day: new `clock_in`, `clock_out` cleared, one more session.
pub fn reopen_record(conn: &Connection, id: i64, clock_in: &str) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance
         SET clock_in = ?1, clock_out = NULL, session_count = session_count + 1
         WHERE id = ?2 AND clock_out IS NOT NULL",
        params![clock_in, id],
    )?;
    Ok(())
}

pub fn close_record(
    conn: &Connection,
    id: i64,
    clock_out: &str,
    duration_seconds: i64,
    hours_worked: f64,
) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance
         SET clock_out = ?1, duration_seconds = ?2, hours_worked = ?3
         WHERE id = ?4 AND clock_out IS NULL",
        params![clock_out, duration_seconds, hours_worked, id],
    )?;
    Ok(())
}

pub fn list_range(
    conn: &Connection,
    employee_id: &str,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance
         WHERE employee_id = ?1 AND date BETWEEN ?2 AND ?3
         ORDER BY date ASC",
    )?;
    let rows = stmt.query_map(params![employee_id, date_key(from), date_key(to)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Per-session detail
// ---------------------------

pub fn open_session(
    conn: &Connection,
    attendance_id: i64,
    employee_id: &str,
    session_no: i64,
    clock_in: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO attendance_sessions (attendance_id, employee_id, session_no, clock_in)
         VALUES (?1, ?2, ?3, ?4)",
        params![attendance_id, employee_id, session_no, clock_in],
    )?;
    Ok(())
}

pub fn close_session(
    conn: &Connection,
    attendance_id: i64,
    clock_out: &str,
    duration_seconds: i64,
) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance_sessions
         SET clock_out = ?1, duration_seconds = ?2
         WHERE attendance_id = ?3 AND clock_out IS NULL",
        params![clock_out, duration_seconds, attendance_id],
    )?;
    Ok(())
}

pub fn sessions_for(conn: &Connection, attendance_id: i64) -> AppResult<Vec<AttendanceSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance_sessions WHERE attendance_id = ?1 ORDER BY session_no ASC",
    )?;
    let rows = stmt.query_map([attendance_id], map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
