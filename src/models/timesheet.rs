use serde::Serialize;

/// Completed work interval. Write-once.
#[derive(Debug, Clone, Serialize)]
pub struct TimesheetEntry {
    pub id: i64,
    pub task_id: i64,
    pub employee_id: String,
    pub employee_name: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_seconds: i64,
    pub memo: String,
    pub created_at: String,
}

/// Insert payload for the ledger.
#[derive(Debug, Clone)]
pub struct NewTimesheetEntry {
    pub task_id: i64,
    pub employee_id: String,
    pub employee_name: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_seconds: i64,
    pub memo: String,
}
