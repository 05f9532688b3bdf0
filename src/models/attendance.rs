use crate::core::clock::{LocalTimestamp, Zone};
use crate::errors::AppResult;
use chrono::NaiveDate;
use serde::Serialize;

/// One row per (employee, calendar day).
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: String,
    pub date: NaiveDate,           // ⇔ attendance.date (TEXT "YYYY-MM-DD", org zone)
    pub clock_in: String,          // ⇔ attendance.clock_in (start of current/most recent session)
    pub clock_out: Option<String>, // NULL = open session
    pub duration_seconds: i64,     // cumulative over all sessions of the day
    pub hours_worked: f64,
    pub session_count: i64,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    pub fn clock_in_at(&self, zone: Zone) -> AppResult<LocalTimestamp> {
        LocalTimestamp::parse(&self.clock_in, zone)
    }
}

/// Per-session detail kept alongside the daily row.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSession {
    pub id: i64,
    pub attendance_id: i64,
    pub employee_id: String,
    pub session_no: i64,
    pub clock_in: String,
    pub clock_out: Option<String>,
    pub duration_seconds: Option<i64>,
}

/// Answer of `clock_in` and `status`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDescriptor {
    pub employee_id: String,
    pub date: NaiveDate,
    pub clock_in: String,
    pub session_count: i64,
    pub reopened: bool,
    pub duration_seconds: i64, // closed sessions of the day so far
}

impl From<&AttendanceRecord> for SessionDescriptor {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            employee_id: r.employee_id.clone(),
            date: r.date,
            clock_in: r.clock_in.clone(),
            session_count: r.session_count,
            reopened: r.session_count > 1,
            duration_seconds: r.duration_seconds,
        }
    }
}

/// Answer of `clock_out`.
#[derive(Debug, Clone, Serialize)]
pub struct ClockOutReport {
    pub employee_id: String,
    pub date: NaiveDate,
    pub clock_in: String,
    pub clock_out: String,
    pub session_seconds: i64,
    pub duration_seconds: i64,
    pub hours_worked: f64,
    pub session_count: i64,
    pub stopped_task_ids: Vec<i64>,
}

/// One row of `summary`.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummary {
    pub employee_id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_seconds: i64,
    pub total_hours: f64,
    pub days_present: i64,
    pub sessions: i64,
    pub expected_working_days: i64,
    pub absent_days: i64,
}
