//! Timesheet Ledger: append-only record of completed work intervals.
//! Downstream reporting (wages, idle time, estimate vs actual) reads it.

use crate::core::clock::LocalTimestamp;
use crate::db::ledger;
use crate::errors::AppResult;
use crate::models::timesheet::{NewTimesheetEntry, TimesheetEntry};
use rusqlite::Connection;

pub struct Ledger;

impl Ledger {
    pub fn append(conn: &Connection, entry: &NewTimesheetEntry, at: &LocalTimestamp) -> AppResult<i64> {
        let id = ledger::insert_entry(conn, entry, &at.to_db_string())?;
        log::debug!(
            "ledger #{}: task {} credited to {} for {}s",
            id,
            entry.task_id,
            entry.employee_id,
            entry.duration_seconds
        );
        Ok(id)
    }

    pub fn entries(
        conn: &Connection,
        task_id: Option<i64>,
        employee_id: Option<&str>,
    ) -> AppResult<Vec<TimesheetEntry>> {
        ledger::list_entries(conn, task_id, employee_id)
    }

    /// Sum of all ledger durations for a task.
    pub fn total_for_task(conn: &Connection, task_id: i64) -> AppResult<i64> {
        ledger::total_seconds_for_task(conn, task_id)
    }
}
