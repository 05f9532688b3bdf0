use super::{open_pool, print_json, system_clock};
use crate::cli::parser::{Commands, TimerCmd};
use crate::config::Config;
use crate::core::timer::{ClientTiming, TimerLogic};
use crate::db::directory;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{detail, info, success};
use crate::utils::formatting::short_ts;
use crate::utils::time::format_hm;

/// Display name given on the command line, else the directory one.
fn resolve_name(pool: &DbPool, employee_id: &str, name: &Option<String>) -> AppResult<String> {
    match name {
        Some(n) => Ok(n.clone()),
        None => Ok(directory::get_employee(&pool.conn, employee_id)?.name),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let Commands::Timer { action } = cmd else {
        return Ok(());
    };

    let clock = system_clock(cfg)?;
    let mut pool = open_pool(cfg)?;

    match action {
        TimerCmd::Start {
            task,
            employee,
            name,
        } => {
            let name = resolve_name(&pool, employee, name)?;
            let started = TimerLogic::start_timer(&mut pool, &clock, *task, &name, employee)?;

            if json {
                return print_json(&started);
            }
            success(format!("Timer started on task #{} for {}", started.task_id, name));
            detail("Started", short_ts(&started.started_at));
        }

        TimerCmd::Stop {
            task,
            employee,
            name,
            logged_seconds,
            start_ms,
            end_ms,
            memo,
        } => {
            let name = resolve_name(&pool, employee, name)?;
            let timing = ClientTiming {
                logged_seconds: *logged_seconds,
                start_ms: *start_ms,
                end_ms: *end_ms,
            };
            let stopped = TimerLogic::stop_timer(
                &mut pool,
                &clock,
                *task,
                &name,
                employee,
                timing,
                memo.as_deref(),
            )?;

            if json {
                return print_json(&stopped);
            }
            if stopped.already_stopped {
                info(format!("Timer on task #{} was not running", stopped.task_id));
            } else {
                success(format!(
                    "Timer stopped on task #{}: {} logged",
                    stopped.task_id,
                    format_hm(stopped.applied_seconds)
                ));
                if let Some(credited) = &stopped.credited_employee_id {
                    detail("Credited to", credited);
                }
            }
            detail("Task total", format_hm(stopped.logged_seconds));
        }
    }

    Ok(())
}
