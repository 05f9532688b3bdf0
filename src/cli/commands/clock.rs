use super::{open_pool, print_json, system_clock};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::core::clock::{Clock, LocalTimestamp};
use crate::errors::AppResult;
use crate::ui::messages::{detail, info, success, warning};
use crate::utils::formatting::short_ts;
use crate::utils::time::format_hm;

/// Handle `in`, `out` and `status`.
pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let clock = system_clock(cfg)?;
    let mut pool = open_pool(cfg)?;

    let parse_at = |at: &Option<String>| -> AppResult<Option<LocalTimestamp>> {
        at.as_deref()
            .map(|s| LocalTimestamp::parse(s, clock.zone()))
            .transpose()
    };

    match cmd {
        Commands::In { employee, at } => {
            let at = parse_at(at)?;
            let session = AttendanceLogic::clock_in(&mut pool, &clock, employee, at)?;

            if json {
                return print_json(&session);
            }
            if session.reopened {
                success(format!(
                    "{} clocked in again on {} (session {})",
                    session.employee_id, session.date, session.session_count
                ));
                detail("Worked so far", format_hm(session.duration_seconds));
            } else {
                success(format!("{} clocked in on {}", session.employee_id, session.date));
            }
            detail("Clock-in", short_ts(&session.clock_in));
        }

        Commands::Out { employee, at } => {
            let at = parse_at(at)?;
            let report = AttendanceLogic::clock_out_with_memo(
                &mut pool,
                &clock,
                employee,
                at,
                &cfg.auto_stop_memo,
            )?;

            if json {
                return print_json(&report);
            }
            success(format!("{} clocked out on {}", report.employee_id, report.date));
            detail("Session", format_hm(report.session_seconds));
            detail(
                "Day total",
                format!("{} ({:.2} h)", format_hm(report.duration_seconds), report.hours_worked),
            );
            detail("Sessions", report.session_count);
            if !report.stopped_task_ids.is_empty() {
                let ids: Vec<String> = report.stopped_task_ids.iter().map(|id| format!("#{id}")).collect();
                warning(format!("Running timers auto-stopped: {}", ids.join(", ")));
            }
        }

        Commands::Status { employee } => {
            let status = AttendanceLogic::status(&mut pool, &clock, employee)?;

            if json {
                return print_json(&status);
            }
            match status {
                Some(s) => {
                    success(format!("{} is clocked in since {}", s.employee_id, short_ts(&s.clock_in)));
                    detail("Session", s.session_count);
                    detail("Earlier today", format_hm(s.duration_seconds));
                }
                None => info(format!("{} has no open session today", employee)),
            }
        }

        _ => {}
    }

    Ok(())
}
