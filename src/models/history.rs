use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Attendance,
    Task,
}

impl EntityKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntityKind::Attendance => "attendance",
            EntityKind::Task => "task",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "attendance" => Some(EntityKind::Attendance),
            "task" => Some(EntityKind::Task),
            _ => None,
        }
    }
}

/// Audit actions, one per state transition.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    ClockIn,
    SessionReopened,
    ClockOut,
    TimerStarted,
    TimerStopped,
    TimerAutoStopped,
}

impl HistoryAction {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            HistoryAction::ClockIn => "clock_in",
            HistoryAction::SessionReopened => "session_reopened",
            HistoryAction::ClockOut => "clock_out",
            HistoryAction::TimerStarted => "timer_started",
            HistoryAction::TimerStopped => "timer_stopped",
            HistoryAction::TimerAutoStopped => "timer_auto_stopped",
        }
    }
}

/// Immutable audit row.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub entity_kind: String,
    pub entity_id: String,
    pub action: String,
    pub description: String,
    pub actor: String,
    pub timestamp: String,
}
