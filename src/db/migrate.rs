use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Directory mirror: employees and tasks with their inline timer fields.
const CREATE_DIRECTORY: &str = r#"
    CREATE TABLE IF NOT EXISTS employees (
        id      TEXT PRIMARY KEY,
        name    TEXT NOT NULL,
        status  TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','inactive'))
    );

    CREATE TABLE IF NOT EXISTS tasks (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        title             TEXT NOT NULL,
        assigned_to       TEXT NOT NULL DEFAULT '',
        status            TEXT NOT NULL DEFAULT 'To Do',
        labels            TEXT NOT NULL DEFAULT '',
        timer_started_at  TEXT,
        logged_seconds    INTEGER NOT NULL DEFAULT 0 CHECK(logged_seconds >= 0)
    );

    CREATE INDEX IF NOT EXISTS idx_tasks_timer ON tasks(timer_started_at);
"#;

const CREATE_ATTENDANCE: &str = r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id       TEXT NOT NULL REFERENCES employees(id),
        date              TEXT NOT NULL,
        clock_in          TEXT NOT NULL,
        clock_out         TEXT,
        duration_seconds  INTEGER NOT NULL DEFAULT 0 CHECK(duration_seconds >= 0),
        hours_worked      REAL NOT NULL DEFAULT 0,
        session_count     INTEGER NOT NULL DEFAULT 1,
        UNIQUE(employee_id, date)
    );

    CREATE INDEX IF NOT EXISTS idx_attendance_open ON attendance(employee_id, clock_out);

    CREATE TABLE IF NOT EXISTS attendance_sessions (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        attendance_id     INTEGER NOT NULL REFERENCES attendance(id) ON DELETE CASCADE,
        employee_id       TEXT NOT NULL,
        session_no        INTEGER NOT NULL,
        clock_in          TEXT NOT NULL,
        clock_out         TEXT,
        duration_seconds  INTEGER,
        UNIQUE(attendance_id, session_no)
    );
"#;

/// Ledger and audit trail. Both are append-only, enforced by triggers.
const CREATE_LEDGER_HISTORY: &str = r#"
    CREATE TABLE IF NOT EXISTS timesheet (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id           INTEGER NOT NULL,
        employee_id       TEXT NOT NULL,
        employee_name     TEXT NOT NULL,
        start_time        TEXT NOT NULL,
        end_time          TEXT NOT NULL,
        duration_seconds  INTEGER NOT NULL CHECK(duration_seconds >= 0),
        memo              TEXT NOT NULL DEFAULT '',
        created_at        TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_timesheet_task ON timesheet(task_id);
    CREATE INDEX IF NOT EXISTS idx_timesheet_employee ON timesheet(employee_id);

    CREATE TRIGGER IF NOT EXISTS timesheet_no_update BEFORE UPDATE ON timesheet
    BEGIN SELECT RAISE(ABORT, 'timesheet is append-only'); END;
    CREATE TRIGGER IF NOT EXISTS timesheet_no_delete BEFORE DELETE ON timesheet
    BEGIN SELECT RAISE(ABORT, 'timesheet is append-only'); END;

    CREATE TABLE IF NOT EXISTS history (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        entity_kind  TEXT NOT NULL CHECK(entity_kind IN ('attendance','task')),
        entity_id    TEXT NOT NULL,
        action       TEXT NOT NULL,
        description  TEXT NOT NULL,
        actor        TEXT NOT NULL,
        timestamp    TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_history_entity ON history(entity_kind, entity_id);

    CREATE TRIGGER IF NOT EXISTS history_no_update BEFORE UPDATE ON history
    BEGIN SELECT RAISE(ABORT, 'history is append-only'); END;
    CREATE TRIGGER IF NOT EXISTS history_no_delete BEFORE DELETE ON history
    BEGIN SELECT RAISE(ABORT, 'history is append-only'); END;
"#;

/// One row per employee with a running timer.
const CREATE_ACTIVE_TIMERS: &str = r#"
    CREATE TABLE IF NOT EXISTS active_timers (
        employee_id  TEXT PRIMARY KEY,
        task_id      INTEGER NOT NULL REFERENCES tasks(id),
        started_at   TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_active_timers_task ON active_timers(task_id);
"#;

/// Ordered list of schema migrations: (version, description, SQL).
const MIGRATIONS: [(&str, &str, &str); 4] = [
    (
        "20250301_0001_create_directory",
        "Created employees and tasks tables",
        CREATE_DIRECTORY,
    ),
    (
        "20250301_0002_create_attendance",
        "Created attendance and attendance_sessions tables",
        CREATE_ATTENDANCE,
    ),
    (
        "20250301_0003_create_ledger_history",
        "Created append-only timesheet and history tables",
        CREATE_LEDGER_HISTORY,
    ),
    (
        "20250412_0004_active_timer_pointer",
        "Created active_timers pointer table",
        CREATE_ACTIVE_TIMERS,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions already recorded in the `log` table, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Each migration runs in its own transaction together with the
/// `migration_applied` marker, so a failed step is retried on the next run.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let batch = format!(
            "BEGIN;\n{sql}\nINSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', '{version}', '{description}');\nCOMMIT;"
        );

        if let Err(e) = conn.execute_batch(&batch) {
            let _ = conn.execute_batch("ROLLBACK;");
            return Err(AppError::Migration(format!("{version}: {e}")));
        }

        log::info!("migration applied: {} → {}", version, description);
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);
        assert_eq!(applied_versions(&conn).unwrap().len(), MIGRATIONS.len());
    }

    #[test]
    fn ledger_rejects_updates_and_deletes() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO timesheet (task_id, employee_id, employee_name, start_time, end_time,
                                    duration_seconds, memo, created_at)
             VALUES (1, 'E1', 'Alice', 'a', 'b', 10, '', 'now')",
            [],
        )
        .unwrap();

        assert!(
            conn.execute("UPDATE timesheet SET duration_seconds = 0", [])
                .is_err()
        );
        assert!(conn.execute("DELETE FROM timesheet", []).is_err());
    }
}
