use crate::core::matching;
use serde::Serialize;

/// Status written when a timer starts.
pub const STATUS_IN_PROGRESS: &str = "In Progress";

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub assigned_to: String, // ⇔ tasks.assigned_to (delimited names)
    pub status: String,
    pub labels: String,
    pub timer_started_at: Option<String>, // ⇔ tasks.timer_started_at (raw text, NULL = idle)
    pub logged_seconds: i64,
}

impl Task {
    pub fn is_running(&self) -> bool {
        self.timer_started_at.is_some()
    }

    pub fn is_assigned_to(&self, name: &str) -> bool {
        matching::is_assigned(&self.assigned_to, name)
    }

    pub fn first_assignee(&self) -> Option<&str> {
        matching::first_assignee(&self.assigned_to)
    }
}
