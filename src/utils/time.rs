//! Duration helpers: seconds → hours, human readable "Xh YYm" strings.

/// Hours with 4-decimal rounding, as stored in `attendance.hours_worked`.
pub fn hours_from_seconds(secs: i64) -> f64 {
    round4(secs as f64 / 3600.0)
}

pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// "7h 05m" style. Negative values keep their sign.
pub fn format_hm(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    format!("{}{}h {:02}m", sign, s / 3600, (s % 3600) / 60)
}

/// "07:05:09" style, used in tables.
pub fn format_hms(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    format!("{}{:02}:{:02}:{:02}", sign, s / 3600, (s % 3600) / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_rounding() {
        assert_eq!(hours_from_seconds(3600), 1.0);
        assert_eq!(hours_from_seconds(28_500), 7.9167);
        assert_eq!(hours_from_seconds(1), 0.0003);
        assert_eq!(hours_from_seconds(0), 0.0);
    }

    #[test]
    fn test_time_format() {
        assert_eq!(format_hm(0), "0h 00m");
        assert_eq!(format_hm(28_500), "7h 55m");
        assert_eq!(format_hm(-90), "-0h 01m");
        assert_eq!(format_hms(45_296), "12:34:56");
    }
}
