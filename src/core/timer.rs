//! TaskTimer Manager.
//!
//! A task timer is either idle (`timer_started_at` NULL) or running. An
//! employee holds at most one running timer across all tasks assigned to
//! them; the check and the write happen inside one immediate transaction
//! and the `active_timers` primary key backs it at storage level.

use crate::core::audit::{AuditTrail, SYSTEM_ACTOR};
use crate::core::clock::{Clock, LocalTimestamp, Zone};
use crate::core::ledger::Ledger;
use crate::db::pool::DbPool;
use crate::db::{directory, tasks};
use crate::errors::{AppError, AppResult};
use crate::models::history::{EntityKind, HistoryAction};
use crate::models::task::{STATUS_IN_PROGRESS, Task};
use crate::models::timesheet::NewTimesheetEntry;
use crate::utils::time::format_hm;
use rusqlite::Connection;
use serde::Serialize;

/// Timing reported by the client that ran the timer UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientTiming {
    pub logged_seconds: Option<i64>,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub task_id: i64,
    pub employee_id: String,
    pub started_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopOutcome {
    pub task_id: i64,
    pub logged_seconds: i64,
    pub applied_seconds: i64,
    pub already_stopped: bool,
    pub credited_employee_id: Option<String>,
    pub timesheet_entry_id: Option<i64>,
}

/// Everything `force_stop` needs besides the task itself.
pub(crate) struct ForceStop<'a> {
    pub caller_id: &'a str,
    pub caller_name: &'a str,
    pub timing: ClientTiming,
    pub now: LocalTimestamp,
    pub memo: &'a str,
    pub action: HistoryAction,
    pub actor: &'a str,
}

pub struct TimerLogic;

impl TimerLogic {
    /// Idle → Running for `task_id` on behalf of one employee.
    pub fn start_timer(
        pool: &mut DbPool,
        clock: &dyn Clock,
        task_id: i64,
        employee_name: &str,
        employee_id: &str,
    ) -> AppResult<StartOutcome> {
        pool.immediate(|tx| {
            let task = tasks::get_task(tx, task_id)?;
            directory::get_employee(tx, employee_id)?;

            // 1️⃣ one running timer per employee, across every assigned task
            if let Some(active) = Self::active_elsewhere(tx, task_id, employee_name, employee_id)? {
                return Err(AppError::AlreadyActiveElsewhere {
                    employee: employee_name.to_string(),
                    active_task_id: active,
                });
            }

            // 2️⃣ must be assigned to the target task
            if !task.is_assigned_to(employee_name) {
                return Err(AppError::NotAssigned {
                    employee: employee_name.to_string(),
                    task_id,
                });
            }

            // 3️⃣ target must be idle
            if let Some(since) = &task.timer_started_at {
                return Err(AppError::AlreadyRunning {
                    task_id,
                    since: since.clone(),
                });
            }

            let now = clock.now();
            let started_at = now.to_db_string();

            if !tasks::set_timer_started(tx, task_id, &started_at, STATUS_IN_PROGRESS)? {
                return Err(AppError::AlreadyRunning {
                    task_id,
                    since: started_at,
                });
            }
            tasks::claim_active_timer(tx, employee_id, task_id, &started_at)?;

            AuditTrail::record(
                tx,
                EntityKind::Task,
                &task_id.to_string(),
                HistoryAction::TimerStarted,
                &format!("Timer started by {} on '{}'", employee_name, task.title),
                employee_name,
                &now,
            )?;

            log::debug!("timer started: task {} by {}", task_id, employee_id);

            Ok(StartOutcome {
                task_id,
                employee_id: employee_id.to_string(),
                started_at,
            })
        })
    }

    /// Running → Idle. Stopping an idle timer is a successful no-op.
    #[allow(clippy::too_many_arguments)]
    pub fn stop_timer(
        pool: &mut DbPool,
        clock: &dyn Clock,
        task_id: i64,
        employee_name: &str,
        employee_id: &str,
        timing: ClientTiming,
        memo: Option<&str>,
    ) -> AppResult<StopOutcome> {
        let zone = clock.zone();

        pool.immediate(|tx| {
            let task = tasks::get_task(tx, task_id)?;

            if !task.is_running() {
                log::debug!("stop on idle task {}: nothing to do", task_id);
                return Ok(StopOutcome {
                    task_id,
                    logged_seconds: task.logged_seconds,
                    applied_seconds: 0,
                    already_stopped: true,
                    credited_employee_id: None,
                    timesheet_entry_id: None,
                });
            }

            Self::force_stop(
                tx,
                zone,
                &task,
                ForceStop {
                    caller_id: employee_id,
                    caller_name: employee_name,
                    timing,
                    now: clock.now(),
                    memo: memo.unwrap_or(""),
                    action: HistoryAction::TimerStopped,
                    actor: if employee_name.is_empty() {
                        SYSTEM_ACTOR
                    } else {
                        employee_name
                    },
                },
            )
        })
    }

    /// Shared stop path for explicit stops and clock-out reconciliation:
    /// resolve the interval, add it to `logged_seconds`, clear the timer,
    /// append one ledger entry and one history entry.
    pub(crate) fn force_stop(
        conn: &Connection,
        zone: Zone,
        task: &Task,
        req: ForceStop<'_>,
    ) -> AppResult<StopOutcome> {
        let (start, end) = Self::resolve_interval(task, &req.timing, req.now, zone)?;
        let actual = start.seconds_until(&end);
        let applied = Self::applied_seconds(task.id, actual, req.timing.logged_seconds);

        let (credited_id, credited_name) =
            Self::employee_of_record(conn, task, req.caller_id, req.caller_name)?;

        let logged_seconds = tasks::clear_timer(conn, task.id, applied)?;
        tasks::release_active_timers_for_task(conn, task.id)?;

        let entry_id = Ledger::append(
            conn,
            &NewTimesheetEntry {
                task_id: task.id,
                employee_id: credited_id.clone(),
                employee_name: credited_name,
                start_time: start.to_db_string(),
                end_time: end.to_db_string(),
                duration_seconds: applied,
                memo: req.memo.to_string(),
            },
            &req.now,
        )?;

        let mut description = format!(
            "Timer stopped on '{}': {} logged ({}s)",
            task.title,
            format_hm(applied),
            applied
        );
        if !req.memo.is_empty() {
            description.push_str(&format!(". Memo: {}", req.memo));
        }

        AuditTrail::record(
            conn,
            EntityKind::Task,
            &task.id.to_string(),
            req.action,
            &description,
            req.actor,
            &req.now,
        )?;

        Ok(StopOutcome {
            task_id: task.id,
            logged_seconds,
            applied_seconds: applied,
            already_stopped: false,
            credited_employee_id: Some(credited_id),
            timesheet_entry_id: Some(entry_id),
        })
    }

    /// Start: client epoch > stored `timer_started_at` > now.
    /// End: client epoch > now.
    fn resolve_interval(
        task: &Task,
        timing: &ClientTiming,
        now: LocalTimestamp,
        zone: Zone,
    ) -> AppResult<(LocalTimestamp, LocalTimestamp)> {
        let start = match (timing.start_ms, &task.timer_started_at) {
            (Some(ms), _) => LocalTimestamp::from_epoch_millis(ms, zone)?,
            (None, Some(raw)) => match LocalTimestamp::parse(raw, zone) {
                Ok(ts) => ts,
                Err(e) => {
                    log::warn!("task {}: unreadable timer start ({}), using now", task.id, e);
                    now
                }
            },
            (None, None) => now,
        };

        let end = match timing.end_ms {
            Some(ms) => LocalTimestamp::from_epoch_millis(ms, zone)?,
            None => now,
        };

        Ok((start, end))
    }

    /// Positive client seconds win over the measured interval; the result is
    /// never negative.
    fn applied_seconds(task_id: i64, actual: i64, client: Option<i64>) -> i64 {
        let applied = match client {
            Some(secs) if secs > 0 => {
                if actual >= 0 && secs > actual {
                    log::warn!(
                        "task {}: client reported {}s but the measured interval is {}s",
                        task_id,
                        secs,
                        actual
                    );
                }
                secs
            }
            _ => actual,
        };

        if applied < 0 {
            log::warn!(
                "task {}: negative duration {}s, recording {}s",
                task_id,
                applied,
                applied.abs()
            );
        }
        applied.abs()
    }

    /// First listed assignee resolved through the directory, else the caller.
    fn employee_of_record(
        conn: &Connection,
        task: &Task,
        caller_id: &str,
        caller_name: &str,
    ) -> AppResult<(String, String)> {
        if let Some(first) = task.first_assignee()
            && let Some(emp) = directory::find_by_name(conn, first)?
        {
            return Ok((emp.id, emp.name));
        }
        Ok((caller_id.to_string(), caller_name.to_string()))
    }

    /// Another running task held by this employee, by name match or by the
    /// active-timer pointer. Stale pointers (task no longer running) are
    /// released on the way.
    fn active_elsewhere(
        conn: &Connection,
        task_id: i64,
        employee_name: &str,
        employee_id: &str,
    ) -> AppResult<Option<i64>> {
        if let Some(t) = tasks::list_running(conn)?
            .into_iter()
            .find(|t| t.id != task_id && t.is_assigned_to(employee_name))
        {
            return Ok(Some(t.id));
        }

        if let Some(pointed) = tasks::active_timer_of(conn, employee_id)? {
            let running = tasks::find_task(conn, pointed)?
                .map(|t| t.is_running())
                .unwrap_or(false);
            if running && pointed != task_id {
                return Ok(Some(pointed));
            }
            if !running {
                log::warn!(
                    "releasing stale active timer pointer {} → task {}",
                    employee_id,
                    pointed
                );
                tasks::release_active_timer_of(conn, employee_id)?;
            }
        }

        Ok(None)
    }
}
