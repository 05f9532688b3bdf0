//! Reconciliation Coordinator: on clock-out, every timer still running for
//! the employee is stopped at the clock-out instant, with the same ledger
//! and audit effects as an explicit stop.

use crate::core::audit::SYSTEM_ACTOR;
use crate::core::clock::{LocalTimestamp, Zone};
use crate::core::timer::{ClientTiming, ForceStop, TimerLogic};
use crate::db::tasks;
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::models::history::HistoryAction;
use crate::models::task::Task;
use rusqlite::Connection;

pub const AUTO_STOP_MEMO: &str = "Employee clocked out";

pub struct Reconciler;

impl Reconciler {
    /// Running tasks assigned to `employee` by name, plus the one named by
    /// the employee's active-timer pointer.
    pub fn dangling_timers(conn: &Connection, employee: &Employee) -> AppResult<Vec<Task>> {
        let mut found: Vec<Task> = tasks::list_running(conn)?
            .into_iter()
            .filter(|t| t.is_assigned_to(&employee.name))
            .collect();

        if let Some(pointed) = tasks::active_timer_of(conn, &employee.id)?
            && !found.iter().any(|t| t.id == pointed)
            && let Some(task) = tasks::find_task(conn, pointed)?
            && task.is_running()
        {
            found.push(task);
        }

        Ok(found)
    }

    /// Force-stop every dangling timer; returns the stopped task ids.
    pub fn stop_dangling(
        conn: &Connection,
        zone: Zone,
        employee: &Employee,
        at: LocalTimestamp,
        memo: &str,
    ) -> AppResult<Vec<i64>> {
        let mut stopped = Vec::new();

        for task in Self::dangling_timers(conn, employee)? {
            let outcome = TimerLogic::force_stop(
                conn,
                zone,
                &task,
                ForceStop {
                    caller_id: &employee.id,
                    caller_name: &employee.name,
                    timing: ClientTiming::default(),
                    now: at,
                    memo,
                    action: HistoryAction::TimerAutoStopped,
                    actor: SYSTEM_ACTOR,
                },
            )?;

            log::info!(
                "clock-out of {} auto-stopped task {} ({}s)",
                employee.id,
                task.id,
                outcome.applied_seconds
            );
            stopped.push(task.id);
        }

        Ok(stopped)
    }
}
