use chrono::{Datelike, NaiveDate, Weekday};

/// Resolve a period string into an inclusive (from, to) range.
///
/// Supported: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, and `start:end` with either
/// side in any of those shapes.
pub fn resolve_period(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some((start, end)) = p.split_once(':') {
        let (from, _) = period_bounds(start)?;
        let (_, to) = period_bounds(end)?;
        if from > to {
            return Err(format!("Invalid period (start after end): {}", p));
        }
        return Ok((from, to));
    }
    period_bounds(p)
}

fn period_bounds(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY-MM
    if let Ok(first) = NaiveDate::parse_from_str(&format!("{}-01", p), "%Y-%m-%d") {
        return Ok((first, last_day_of_month(first.year(), first.month())));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
        && let (Some(first), Some(last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        )
    {
        return Ok((first, last));
    }

    Err(format!("Invalid period: {}", p))
}

/// First and last day of the month containing `d`.
pub fn month_of(d: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = d.with_day(1).unwrap_or(d);
    (first, last_day_of_month(d.year(), d.month()))
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Days in `[from, to]` that are not weekend days.
pub fn working_days(from: NaiveDate, to: NaiveDate, weekend: &[Weekday]) -> i64 {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| !weekend.contains(&d.weekday()))
        .count() as i64
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn periods_resolve_to_bounds() {
        assert_eq!(resolve_period("2025-02").unwrap(), (d("2025-02-01"), d("2025-02-28")));
        assert_eq!(resolve_period("2024").unwrap(), (d("2024-01-01"), d("2024-12-31")));
        assert_eq!(resolve_period("2025-03-04").unwrap(), (d("2025-03-04"), d("2025-03-04")));
        assert_eq!(
            resolve_period("2025-01:2025-03-10").unwrap(),
            (d("2025-01-01"), d("2025-03-10"))
        );
        assert!(resolve_period("2025-03:2025-01").is_err());
        assert!(resolve_period("march").is_err());
    }

    #[test]
    fn working_days_skip_weekends() {
        let weekend = [Weekday::Sat, Weekday::Sun];
        // 2025-03-03 is a Monday
        assert_eq!(working_days(d("2025-03-03"), d("2025-03-09"), &weekend), 5);
        assert_eq!(working_days(d("2025-03-01"), d("2025-03-31"), &weekend), 21);
        assert_eq!(working_days(d("2025-03-08"), d("2025-03-09"), &weekend), 0);
        assert_eq!(working_days(d("2025-03-09"), d("2025-03-08"), &weekend), 0);
    }

    #[test]
    fn month_bounds_handle_december() {
        assert_eq!(month_of(d("2024-12-15")), (d("2024-12-01"), d("2024-12-31")));
    }
}
