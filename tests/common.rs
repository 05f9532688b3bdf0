#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rshift::core::clock::{FixedClock, Zone};
use rshift::db::initialize::init_db;
use rshift::db::pool::DbPool;
use rshift::db::{directory, tasks};
use rshift::models::employee::{Employee, EmployeeStatus};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const ASHA: &str = "E1";
pub const BEN: &str = "E2";

pub fn rti() -> Command {
    cargo_bin_cmd!("rshift")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rshift.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a DB through the CLI and register two employees
pub fn init_db_with_staff(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for (id, name) in [(ASHA, "Asha Rao"), (BEN, "Ben Ode")] {
        rti()
            .args(["--db", db_path, "employee", "add", id, name])
            .assert()
            .success();
    }
}

pub fn ist() -> Zone {
    Zone::parse("+05:30").expect("zone")
}

/// In-memory engine: migrated schema, two active employees, a clock fixed
/// at Monday 2025-03-03 09:00 (+05:30).
pub fn engine() -> (DbPool, FixedClock) {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");

    add_employee(&pool, ASHA, "Asha Rao", true);
    add_employee(&pool, BEN, "Ben Ode", true);

    let clock = FixedClock::at("2025-03-03 09:00", ist()).expect("clock");
    (pool, clock)
}

pub fn add_employee(pool: &DbPool, id: &str, name: &str, active: bool) {
    directory::insert_employee(
        &pool.conn,
        &Employee {
            id: id.to_string(),
            name: name.to_string(),
            status: if active {
                EmployeeStatus::Active
            } else {
                EmployeeStatus::Inactive
            },
        },
    )
    .expect("insert employee");
}

pub fn add_task(pool: &DbPool, title: &str, assigned_to: &str) -> i64 {
    tasks::insert_task(&pool.conn, title, assigned_to, "").expect("insert task")
}
