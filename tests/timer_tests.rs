use rshift::core::clock::LocalTimestamp;
use rshift::core::ledger::Ledger;
use rshift::core::timer::{ClientTiming, TimerLogic};
use rshift::db::initialize::init_db;
use rshift::db::pool::DbPool;
use rshift::db::tasks;
use rshift::errors::AppError;
use rshift::models::task::STATUS_IN_PROGRESS;

mod common;
use common::{ASHA, BEN, add_employee, add_task, engine, ist, setup_test_db};

#[test]
fn test_start_sets_timer_and_pointer() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Fix login", "Asha Rao");

    let started = TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    assert_eq!(started.started_at, "2025-03-03T09:00:00+05:30");

    let task = tasks::get_task(&pool.conn, a).unwrap();
    assert!(task.is_running());
    assert_eq!(task.status, STATUS_IN_PROGRESS);
    assert_eq!(tasks::active_timer_of(&pool.conn, ASHA).unwrap(), Some(a));
}

#[test]
fn test_second_timer_elsewhere_is_rejected() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");
    let b = add_task(&pool, "Task B", "asha rao, Ben Ode");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    let err = TimerLogic::start_timer(&mut pool, &clock, b, "Asha Rao", ASHA).unwrap_err();

    match err {
        AppError::AlreadyActiveElsewhere { active_task_id, .. } => assert_eq!(active_task_id, a),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(tasks::get_task(&pool.conn, b).unwrap().timer_started_at.is_none());
}

#[test]
fn test_other_employee_may_run_a_timer_meanwhile() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");
    let b = add_task(&pool, "Task B", "Ben Ode");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    TimerLogic::start_timer(&mut pool, &clock, b, "Ben Ode", BEN).unwrap();

    assert_eq!(tasks::list_running(&pool.conn).unwrap().len(), 2);
}

#[test]
fn test_start_requires_assignment() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Ben Ode");

    let err = TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap_err();
    assert!(matches!(err, AppError::NotAssigned { task_id, .. } if task_id == a));
}

#[test]
fn test_start_on_running_task_is_already_running() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    let err = TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap_err();

    assert!(matches!(err, AppError::AlreadyRunning { .. }));
}

#[test]
fn test_unknown_task_is_not_found() {
    let (mut pool, clock) = engine();

    let err = TimerLogic::start_timer(&mut pool, &clock, 99, "Asha Rao", ASHA).unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "Task", .. }));

    let err = TimerLogic::stop_timer(&mut pool, &clock, 99, "Asha Rao", ASHA, ClientTiming::default(), None)
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[test]
fn test_stop_logs_interval_once_and_is_idempotent() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(25 * 60);

    let first = TimerLogic::stop_timer(
        &mut pool,
        &clock,
        a,
        "Asha Rao",
        ASHA,
        ClientTiming::default(),
        Some("done"),
    )
    .unwrap();
    assert!(!first.already_stopped);
    assert_eq!(first.applied_seconds, 1500);
    assert_eq!(first.logged_seconds, 1500);

    clock.advance_secs(60);
    let second = TimerLogic::stop_timer(
        &mut pool,
        &clock,
        a,
        "Asha Rao",
        ASHA,
        ClientTiming::default(),
        None,
    )
    .unwrap();
    assert!(second.already_stopped);
    assert_eq!(second.logged_seconds, 1500);

    let entries = Ledger::entries(&pool.conn, Some(a), None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].memo, "done");
    assert_eq!(entries[0].start_time, "2025-03-03T09:00:00+05:30");
    assert_eq!(entries[0].end_time, "2025-03-03T09:25:00+05:30");

    assert_eq!(tasks::active_timer_of(&pool.conn, ASHA).unwrap(), None);
}

#[test]
fn test_client_epochs_define_the_interval() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(3 * 3600);

    // an interval unrelated to the stored start
    let start = LocalTimestamp::parse("2025-03-01 08:00", ist()).unwrap().epoch_millis();
    let timing = ClientTiming {
        logged_seconds: None,
        start_ms: Some(start),
        end_ms: Some(start + 90_000),
    };

    let out = TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, timing, None).unwrap();
    assert_eq!(out.applied_seconds, 90);

    let entry = &Ledger::entries(&pool.conn, Some(a), None).unwrap()[0];
    assert_eq!(entry.start_time, "2025-03-01T08:00:00+05:30");
    assert_eq!(entry.duration_seconds, 90);
}

#[test]
fn test_client_logged_seconds_win_when_positive() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(600);

    let timing = ClientTiming {
        logged_seconds: Some(420),
        ..ClientTiming::default()
    };
    let out = TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, timing, None).unwrap();

    assert_eq!(out.applied_seconds, 420);
    assert_eq!(Ledger::total_for_task(&pool.conn, a).unwrap(), 420);
}

#[test]
fn test_logged_seconds_equal_sum_of_stops() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    let mut expected = 0;
    for minutes in [10, 35, 5] {
        TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
        clock.advance_secs(minutes * 60);
        TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, ClientTiming::default(), None)
            .unwrap();
        expected += minutes * 60;
        clock.advance_secs(120);
    }

    let task = tasks::get_task(&pool.conn, a).unwrap();
    assert_eq!(task.logged_seconds, expected);
    assert_eq!(Ledger::total_for_task(&pool.conn, a).unwrap(), expected);
}

#[test]
fn test_stop_credits_first_listed_assignee() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Pairing", "Ben Ode; Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(300);
    let out = TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, ClientTiming::default(), None)
        .unwrap();

    assert_eq!(out.credited_employee_id.as_deref(), Some(BEN));
    let entry = &Ledger::entries(&pool.conn, None, Some(BEN)).unwrap()[0];
    assert_eq!(entry.employee_name, "Ben Ode");
}

#[test]
fn test_unresolved_first_assignee_falls_back_to_caller() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Contractor work", "External Vendor, Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(60);
    let out = TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, ClientTiming::default(), None)
        .unwrap();

    assert_eq!(out.credited_employee_id.as_deref(), Some(ASHA));
}

#[test]
fn test_single_timer_holds_across_connections() {
    let db_path = setup_test_db("timer_two_connections");

    let mut first = DbPool::new(&db_path).unwrap();
    init_db(&first.conn).unwrap();
    add_employee(&first, ASHA, "Asha Rao", true);
    let a = add_task(&first, "Task A", "Asha Rao");
    let b = add_task(&first, "Task B", "Asha Rao");

    let mut second = DbPool::new(&db_path).unwrap();
    let (_, clock) = engine();

    TimerLogic::start_timer(&mut first, &clock, a, "Asha Rao", ASHA).unwrap();
    let err = TimerLogic::start_timer(&mut second, &clock, b, "Asha Rao", ASHA).unwrap_err();

    assert!(matches!(err, AppError::AlreadyActiveElsewhere { .. }));
    assert!(tasks::get_task(&second.conn, b).unwrap().timer_started_at.is_none());

    std::fs::remove_file(&db_path).ok();
}

#[test]
fn test_naive_stored_start_is_read_in_organization_zone() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    // a start written without an offset by an older client
    pool.conn
        .execute(
            "UPDATE tasks SET timer_started_at = '2025-03-03 08:00:00' WHERE id = ?1",
            [a],
        )
        .unwrap();

    let out = TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, ClientTiming::default(), None)
        .unwrap();
    assert_eq!(out.applied_seconds, 3600);

    let entry = &Ledger::entries(&pool.conn, Some(a), None).unwrap()[0];
    assert_eq!(entry.start_time, "2025-03-03T08:00:00+05:30");
    assert_eq!(entry.duration_seconds, 3600);
}

#[test]
fn test_inverted_client_interval_is_recorded_as_absolute() {
    let (mut pool, clock) = engine();
    let a = add_task(&pool, "Task A", "Asha Rao");

    TimerLogic::start_timer(&mut pool, &clock, a, "Asha Rao", ASHA).unwrap();
    clock.advance_secs(3600);

    let end = LocalTimestamp::parse("2025-03-03 09:00", ist()).unwrap().epoch_millis();
    let timing = ClientTiming {
        logged_seconds: None,
        start_ms: Some(end + 300_000),
        end_ms: Some(end),
    };

    let out = TimerLogic::stop_timer(&mut pool, &clock, a, "Asha Rao", ASHA, timing, None).unwrap();
    assert_eq!(out.applied_seconds, 300);
    assert_eq!(out.logged_seconds, 300);

    let entry = &Ledger::entries(&pool.conn, Some(a), None).unwrap()[0];
    assert_eq!(entry.duration_seconds, 300);
    assert_eq!(tasks::get_task(&pool.conn, a).unwrap().logged_seconds, 300);
}
