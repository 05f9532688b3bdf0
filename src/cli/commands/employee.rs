use super::{open_pool, print_json};
use crate::cli::parser::{Commands, EmployeeCmd};
use crate::config::Config;
use crate::db::{directory, log};
use crate::errors::AppResult;
use crate::models::employee::{Employee, EmployeeStatus};
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_state;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };
    let pool = open_pool(cfg)?;

    match action {
        EmployeeCmd::Add { id, name, inactive } => {
            let emp = Employee {
                id: id.clone(),
                name: name.clone(),
                status: if *inactive {
                    EmployeeStatus::Inactive
                } else {
                    EmployeeStatus::Active
                },
            };
            directory::insert_employee(&pool.conn, &emp)?;
            log::ttlog(&pool.conn, "employee", &emp.id, &format!("Saved '{}'", emp.name))?;

            if json {
                return print_json(&emp);
            }
            success(format!("Employee {} saved ({})", emp.id, emp.name));
        }

        EmployeeCmd::List => {
            let all = directory::list_employees(&pool.conn)?;
            if json {
                return print_json(&all);
            }
            if all.is_empty() {
                info("No employees.");
                return Ok(());
            }

            let mut table = Table::new(vec!["ID", "NAME", "STATUS"]);
            for e in &all {
                table.add_row(vec![
                    e.id.clone(),
                    e.name.clone(),
                    e.status.to_db_str().to_string(),
                ]);
            }
            print!("{}", table.render());
            println!(
                "\n{} active",
                colorize_state(&all.iter().filter(|e| e.is_active()).count().to_string(), true)
            );
        }
    }

    Ok(())
}
