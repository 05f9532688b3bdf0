//! AttendanceSession Manager.
//!
//! One `attendance` row per (employee, day). A second clock-in on a closed
//! day reopens the same row: `clock_in` is overwritten and `session_count`
//! grows, while `duration_seconds` keeps the running total. The individual
//! sessions are kept in `attendance_sessions`.

use crate::core::audit::AuditTrail;
use crate::core::clock::{Clock, LocalTimestamp};
use crate::core::reconcile::{AUTO_STOP_MEMO, Reconciler};
use crate::db::pool::DbPool;
use crate::db::{attendance, directory};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{
    AttendanceRecord, AttendanceSummary, ClockOutReport, SessionDescriptor,
};
use crate::models::history::{EntityKind, HistoryAction};
use crate::utils::date::working_days;
use crate::utils::time::{format_hm, hours_from_seconds};
use chrono::{NaiveDate, Weekday};
use rusqlite::Connection;

pub struct AttendanceLogic;

fn record_entity_id(r: &AttendanceRecord) -> String {
    format!("{}@{}", r.employee_id, r.date)
}

impl AttendanceLogic {
    pub fn clock_in(
        pool: &mut DbPool,
        clock: &dyn Clock,
        employee_id: &str,
        at: Option<LocalTimestamp>,
    ) -> AppResult<SessionDescriptor> {
        pool.immediate(|tx| {
            directory::get_employee(tx, employee_id)?;

            let now = at.unwrap_or_else(|| clock.now());
            let day = now.date();
            let clock_in = now.to_db_string();

            // a session left open on an earlier day still counts as active
            if let Some(open) = attendance::latest_open(tx, employee_id)?
                && open.date != day
            {
                return Err(AppError::AlreadyActive {
                    employee_id: employee_id.to_string(),
                    since: open.clock_in,
                });
            }

            let (record_id, session_no, action, description) =
                match attendance::find_for_day(tx, employee_id, &day)? {
                    Some(r) if r.is_open() => {
                        return Err(AppError::AlreadyActive {
                            employee_id: employee_id.to_string(),
                            since: r.clock_in,
                        });
                    }
                    Some(r) => {
                        attendance::reopen_record(tx, r.id, &clock_in)?;
                        (
                            r.id,
                            r.session_count + 1,
                            HistoryAction::SessionReopened,
                            format!(
                                "Clocked in again at {} (session {}, {} already worked)",
                                now.format("%H:%M"),
                                r.session_count + 1,
                                format_hm(r.duration_seconds)
                            ),
                        )
                    }
                    None => {
                        let id = attendance::insert_record(tx, employee_id, &day, &clock_in)?;
                        (
                            id,
                            1,
                            HistoryAction::ClockIn,
                            format!("Clocked in at {}", now.format("%H:%M")),
                        )
                    }
                };

            attendance::open_session(tx, record_id, employee_id, session_no, &clock_in)?;

            let record = Self::load_day(tx, employee_id, &day)?;
            AuditTrail::record(
                tx,
                EntityKind::Attendance,
                &record_entity_id(&record),
                action,
                &description,
                employee_id,
                &now,
            )?;

            log::debug!("clock-in {} on {} (session {})", employee_id, day, session_no);
            Ok(SessionDescriptor::from(&record))
        })
    }

    pub fn clock_out(
        pool: &mut DbPool,
        clock: &dyn Clock,
        employee_id: &str,
        at: Option<LocalTimestamp>,
    ) -> AppResult<ClockOutReport> {
        Self::clock_out_with_memo(pool, clock, employee_id, at, AUTO_STOP_MEMO)
    }

    /// Close the open session, then reconcile dangling timers, all in one
    /// transaction.
    pub fn clock_out_with_memo(
        pool: &mut DbPool,
        clock: &dyn Clock,
        employee_id: &str,
        at: Option<LocalTimestamp>,
        auto_stop_memo: &str,
    ) -> AppResult<ClockOutReport> {
        let zone = clock.zone();

        pool.immediate(|tx| {
            let employee = directory::get_employee(tx, employee_id)?;

            let now = at.unwrap_or_else(|| clock.now());

            // today's open row first, then an open row left from an earlier day
            let record = Self::open_record(tx, employee_id, &now.date())?
                .ok_or_else(|| AppError::NotActive {
                    employee_id: employee_id.to_string(),
                })?;

            let started = record.clock_in_at(zone)?;
            let session_seconds = started.seconds_until(&now).max(0);
            let total = record.duration_seconds + session_seconds;
            let hours = hours_from_seconds(total);
            let clock_out = now.to_db_string();

            attendance::close_record(tx, record.id, &clock_out, total, hours)?;
            attendance::close_session(tx, record.id, &clock_out, session_seconds)?;

            AuditTrail::record(
                tx,
                EntityKind::Attendance,
                &record_entity_id(&record),
                HistoryAction::ClockOut,
                &format!(
                    "Clocked out at {} after {} (day total {})",
                    now.format("%H:%M"),
                    format_hm(session_seconds),
                    format_hm(total)
                ),
                employee_id,
                &now,
            )?;

            let stopped_task_ids =
                Reconciler::stop_dangling(tx, zone, &employee, now, auto_stop_memo)?;

            log::debug!(
                "clock-out {} on {}: +{}s, total {}s, {} timer(s) auto-stopped",
                employee_id,
                record.date,
                session_seconds,
                total,
                stopped_task_ids.len()
            );

            Ok(ClockOutReport {
                employee_id: employee_id.to_string(),
                date: record.date,
                clock_in: record.clock_in.clone(),
                clock_out,
                session_seconds,
                duration_seconds: total,
                hours_worked: hours,
                session_count: record.session_count,
                stopped_task_ids,
            })
        })
    }

    /// The open session clock-out would close: today's, else one left open
    /// on an earlier day.
    pub fn status(
        pool: &mut DbPool,
        clock: &dyn Clock,
        employee_id: &str,
    ) -> AppResult<Option<SessionDescriptor>> {
        directory::get_employee(&pool.conn, employee_id)?;

        let open = Self::open_record(&pool.conn, employee_id, &clock.today())?;
        Ok(open.map(|r| SessionDescriptor::from(&r)))
    }

    /// Aggregate attendance over `[from, to]`, one row per employee.
    /// Without an employee id every active directory entry is reported.
    pub fn summary(
        pool: &mut DbPool,
        employee_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
        weekend: &[Weekday],
    ) -> AppResult<Vec<AttendanceSummary>> {
        if from > to {
            return Err(AppError::InvalidDate(format!("{} is after {}", from, to)));
        }

        let employees = match employee_id {
            Some(id) => vec![directory::get_employee(&pool.conn, id)?],
            None => directory::list_employees(&pool.conn)?
                .into_iter()
                .filter(|e| e.is_active())
                .collect(),
        };

        let expected = working_days(from, to, weekend);

        let mut out = Vec::with_capacity(employees.len());
        for emp in employees {
            let records = attendance::list_range(&pool.conn, &emp.id, &from, &to)?;

            let total_seconds: i64 = records.iter().map(|r| r.duration_seconds).sum();
            let sessions: i64 = records.iter().map(|r| r.session_count).sum();
            let days_present = records.len() as i64;

            out.push(AttendanceSummary {
                employee_id: emp.id,
                from,
                to,
                total_seconds,
                total_hours: hours_from_seconds(total_seconds),
                days_present,
                sessions,
                expected_working_days: expected,
                absent_days: (expected - days_present).max(0),
            });
        }

        Ok(out)
    }

    fn open_record(
        conn: &Connection,
        employee_id: &str,
        day: &NaiveDate,
    ) -> AppResult<Option<AttendanceRecord>> {
        match attendance::find_for_day(conn, employee_id, day)? {
            Some(r) if r.is_open() => Ok(Some(r)),
            _ => attendance::latest_open(conn, employee_id),
        }
    }

    fn load_day(conn: &Connection, employee_id: &str, day: &NaiveDate) -> AppResult<AttendanceRecord> {
        attendance::find_for_day(conn, employee_id, day)?
            .ok_or_else(|| AppError::not_found("Attendance record", format!("{}@{}", employee_id, day)))
    }
}
