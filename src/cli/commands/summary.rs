use super::{open_pool, print_json, system_clock};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::core::clock::Clock;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_absences};
use crate::utils::date::{month_of, resolve_period};
use crate::utils::formatting::bold;
use crate::utils::table::Table;
use crate::utils::time::format_hm;

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Summary { employee, period } = cmd {
        let clock = system_clock(cfg)?;
        let weekend = cfg.weekend()?;

        // default: current month in the organization zone
        let (from, to) = match period {
            Some(p) => resolve_period(p).map_err(AppError::InvalidDate)?,
            None => month_of(clock.today()),
        };

        let mut pool = open_pool(cfg)?;
        let rows = AttendanceLogic::summary(&mut pool, employee.as_deref(), from, to, &weekend)?;

        if json {
            return print_json(&rows);
        }

        if rows.is_empty() {
            info("No active employees.");
            return Ok(());
        }

        info(format!(
            "Attendance from {} to {}",
            bold(&from.to_string()),
            bold(&to.to_string())
        ));
        println!();

        let mut table = Table::new(vec![
            "EMPLOYEE", "WORKED", "HOURS", "DAYS", "SESSIONS", "EXPECTED", "ABSENT",
        ]);
        let mut total_absent = 0;
        for r in &rows {
            total_absent += r.absent_days;
            table.add_row(vec![
                r.employee_id.clone(),
                format_hm(r.total_seconds),
                format!("{:.2}", r.total_hours),
                r.days_present.to_string(),
                r.sessions.to_string(),
                r.expected_working_days.to_string(),
                r.absent_days.to_string(),
            ]);
        }
        print!("{}", table.render());

        println!();
        println!(
            "Total absences: {}{}{}",
            color_for_absences(total_absent),
            total_absent,
            RESET
        );
    }

    Ok(())
}
