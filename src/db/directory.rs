//! Read side of the employee directory, plus the seeding insert used by the
//! `employee add` admin command.

use crate::core::matching;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, EmployeeStatus};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<Employee> {
    let status_str: String = row.get("status")?;
    let status = EmployeeStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid status: {}", status_str))),
        )
    })?;

    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        status,
    })
}

pub fn insert_employee(conn: &Connection, emp: &Employee) -> AppResult<()> {
    conn.execute(
        "INSERT INTO employees (id, name, status) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, status = excluded.status",
        params![emp.id, emp.name, emp.status.to_db_str()],
    )?;
    Ok(())
}

pub fn find_employee(conn: &Connection, id: &str) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM employees WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get_employee(conn: &Connection, id: &str) -> AppResult<Employee> {
    find_employee(conn, id)?.ok_or_else(|| AppError::not_found("Employee", id))
}

pub fn list_employees(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare("SELECT * FROM employees ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Resolve a display name against the directory (case/space-insensitive).
/// Active employees win over inactive ones with the same name.
pub fn find_by_name(conn: &Connection, name: &str) -> AppResult<Option<Employee>> {
    let needle = matching::normalize(name);
    if needle.is_empty() {
        return Ok(None);
    }

    let mut found: Option<Employee> = None;
    for emp in list_employees(conn)? {
        if matching::normalize(&emp.name) != needle {
            continue;
        }
        if emp.is_active() {
            return Ok(Some(emp));
        }
        found.get_or_insert(emp);
    }
    Ok(found)
}
