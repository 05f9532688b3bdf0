use rshift::core::attendance::AttendanceLogic;
use rshift::core::audit::{AuditTrail, SYSTEM_ACTOR};
use rshift::core::ledger::Ledger;
use rshift::core::reconcile::AUTO_STOP_MEMO;
use rshift::core::timer::{ClientTiming, TimerLogic};
use rshift::db::tasks;
use rshift::models::history::EntityKind;

mod common;
use common::{ASHA, BEN, add_task, engine};

#[test]
fn test_clock_out_auto_stops_forgotten_timer() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    AttendanceLogic::clock_in(&mut pool, &clock, ASHA, None).unwrap();

    clock.set_str("2025-03-03 09:05").unwrap();
    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();

    clock.set_str("2025-03-03 17:00").unwrap();
    let report = AttendanceLogic::clock_out(&mut pool, &clock, ASHA, None).unwrap();

    assert_eq!(report.stopped_task_ids, vec![a]);
    assert_eq!(report.duration_seconds, 8 * 3600);

    let task = tasks::get_task(&pool.conn, a).unwrap();
    assert!(task.timer_started_at.is_none());
    assert_eq!(task.logged_seconds, 28_500);

    let entries = Ledger::entries(&pool.conn, Some(a), None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].memo, AUTO_STOP_MEMO);
    assert_eq!(entries[0].duration_seconds, 28_500);
    assert_eq!(entries[0].end_time, "2025-03-03T17:00:00+05:30");

    let history = AuditTrail::entries(&pool.conn, Some(EntityKind::Task), Some(a.to_string().as_str())).unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.action, "timer_auto_stopped");
    assert_eq!(last.actor, SYSTEM_ACTOR);
    assert!(last.description.contains(AUTO_STOP_MEMO));

    assert_eq!(tasks::active_timer_of(&pool.conn, ASHA).unwrap(), None);
}

#[test]
fn test_auto_stop_reads_naive_start_in_organization_zone() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    AttendanceLogic::clock_in(&mut pool, &clock, ASHA, None).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    pool.conn
        .execute(
            "UPDATE tasks SET timer_started_at = '2025-03-03 10:00:00' WHERE id = ?1",
            [a],
        )
        .unwrap();

    clock.set_str("2025-03-03 12:30").unwrap();
    let report = AttendanceLogic::clock_out(&mut pool, &clock, ASHA, None).unwrap();
    assert_eq!(report.stopped_task_ids, vec![a]);

    let entry = &Ledger::entries(&pool.conn, Some(a), None).unwrap()[0];
    assert_eq!(entry.start_time, "2025-03-03T10:00:00+05:30");
    assert_eq!(entry.duration_seconds, 9000);
    assert_eq!(tasks::get_task(&pool.conn, a).unwrap().logged_seconds, 9000);
}

#[test]
fn test_clock_out_with_custom_memo() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    AttendanceLogic::clock_in(&mut pool, &clock, ASHA, None).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(3600);

    AttendanceLogic::clock_out_with_memo(&mut pool, &clock, ASHA, None, "Shift ended").unwrap();

    let entries = Ledger::entries(&pool.conn, Some(a), None).unwrap();
    assert_eq!(entries[0].memo, "Shift ended");
}

#[test]
fn test_clock_out_leaves_other_employees_timers_alone() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");
    let b = add_task(&pool, "Task B", "Ben Ode");

    AttendanceLogic::clock_in(&mut pool, &clock, ASHA, None).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, b, "Ben Ode", BEN).unwrap();

    clock.advance_secs(3600);
    let report = AttendanceLogic::clock_out(&mut pool, &clock, ASHA, None).unwrap();

    assert_eq!(report.stopped_task_ids, vec![a]);
    assert!(tasks::get_task(&pool.conn, b).unwrap().is_running());
}

#[test]
fn test_clock_out_without_running_timer_stops_nothing() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    AttendanceLogic::clock_in(&mut pool, &clock, ASHA, None).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(600);
    TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, ClientTiming::default(), None)
        .unwrap();

    clock.advance_secs(600);
    let report = AttendanceLogic::clock_out(&mut pool, &clock, ASHA, None).unwrap();

    assert!(report.stopped_task_ids.is_empty());
    assert_eq!(Ledger::entries(&pool.conn, Some(a), None).unwrap().len(), 1);
}

#[test]
fn test_pointer_catches_timer_after_rename() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    AttendanceLogic::clock_in(&mut pool, &clock, ASHA, None).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();

    // the assignment text no longer matches the employee name
    pool.conn
        .execute("UPDATE tasks SET assigned_to = 'A. Rao' WHERE id = ?1", [a])
        .unwrap();

    clock.advance_secs(1800);
    let report = AttendanceLogic::clock_out(&mut pool, &clock, ASHA, None).unwrap();

    assert_eq!(report.stopped_task_ids, vec![a]);
    assert!(!tasks::get_task(&pool.conn, a).unwrap().is_running());
}

#[test]
fn test_every_transition_is_audited_once() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    AttendanceLogic::clock_in(&mut pool, &clock, ASHA, None).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(3600);
    AttendanceLogic::clock_out(&mut pool, &clock, ASHA, None).unwrap();

    let actions: Vec<String> = AuditTrail::entries(&pool.conn, None, None)
        .unwrap()
        .into_iter()
        .map(|h| h.action)
        .collect();

    assert_eq!(
        actions,
        vec!["clock_in", "timer_started", "clock_out", "timer_auto_stopped"]
    );
}

#[test]
fn test_ledger_and_history_are_append_only() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(60);
    TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, ClientTiming::default(), None)
        .unwrap();

    assert!(pool.conn.execute("UPDATE timesheet SET memo = 'edited'", []).is_err());
    assert!(pool.conn.execute("DELETE FROM timesheet", []).is_err());
    assert!(pool.conn.execute("UPDATE history SET actor = 'someone'", []).is_err());
    assert!(pool.conn.execute("DELETE FROM history", []).is_err());

    assert_eq!(Ledger::entries(&pool.conn, None, None).unwrap().len(), 1);
}

#[test]
fn test_logged_seconds_cannot_go_negative() {
    let (pool, _clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    assert!(tasks::clear_timer(&pool.conn, a, -10).is_err());
    assert!(
        pool.conn
            .execute("UPDATE tasks SET logged_seconds = -1 WHERE id = ?1", [a])
            .is_err()
    );
}
