/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Absentee color:
/// 0 → green
/// \>0 → red
pub fn color_for_absences(value: i64) -> &'static str {
    if value > 0 { RED } else { GREEN }
}

/// Green for a running timer / open session, grey otherwise.
pub fn colorize_state(value: &str, active: bool) -> String {
    if active {
        format!("{GREEN}{value}{RESET}")
    } else {
        format!("{GREY}{value}{RESET}")
    }
}
