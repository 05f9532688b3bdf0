//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

/// Exit code for transient store failures (`EX_TEMPFAIL`).
pub const EXIT_TEMPFAIL: i32 = 75;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    #[error("Store temporarily unavailable, retry later: {0}")]
    TransientStore(rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidZone(String),

    // ---------------------------
    // Attendance / timer logic
    // ---------------------------
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Employee {employee_id} is already clocked in since {since}")]
    AlreadyActive { employee_id: String, since: String },

    #[error("Employee {employee_id} has no open attendance session")]
    NotActive { employee_id: String },

    #[error("Timer for task {task_id} is already running since {since}")]
    AlreadyRunning { task_id: i64, since: String },

    #[error("Employee {employee} already has an active timer on task {active_task_id}")]
    AlreadyActiveElsewhere {
        employee: String,
        active_task_id: i64,
    },

    #[error("Employee '{employee}' is not assigned to task {task_id}")]
    NotAssigned { employee: String, task_id: i64 },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                AppError::TransientStore(e)
            }
            _ => AppError::Db(e),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Other(format!("JSON serialization failed: {e}"))
    }
}

impl AppError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True for failures worth retrying (the store was busy or locked).
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::TransientStore(_))
    }

    /// Process exit code used by the CLI layer.
    pub fn exit_code(&self) -> i32 {
        if self.is_transient() {
            EXIT_TEMPFAIL
        } else {
            1
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    #[test]
    fn busy_and_locked_are_transient() {
        let busy = rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_BUSY), None);
        let locked = rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_LOCKED), None);

        assert!(AppError::from(busy).is_transient());
        assert!(AppError::from(locked).is_transient());
    }

    #[test]
    fn constraint_failure_is_not_transient() {
        let e = rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_CONSTRAINT), None);
        let app = AppError::from(e);

        assert!(!app.is_transient());
        assert_eq!(app.exit_code(), 1);
    }

    #[test]
    fn transient_maps_to_tempfail() {
        let busy = rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_BUSY), None);
        assert_eq!(AppError::from(busy).exit_code(), EXIT_TEMPFAIL);
    }
}
