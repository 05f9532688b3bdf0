pub mod attendance;
pub mod employee;
pub mod history;
pub mod task;
pub mod timesheet;
