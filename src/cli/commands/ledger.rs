use super::{open_pool, print_json};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::formatting::{or_dash, short_ts};
use crate::utils::table::Table;
use crate::utils::time::{format_hm, format_hms};

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Ledger { task, employee } = cmd {
        let pool = open_pool(cfg)?;
        let entries = Ledger::entries(&pool.conn, *task, employee.as_deref())?;

        if json {
            return print_json(&entries);
        }
        if entries.is_empty() {
            info("No timesheet entries.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            "ID", "TASK", "EMPLOYEE", "START", "END", "DURATION", "MEMO",
        ]);
        let mut total = 0;
        for e in &entries {
            total += e.duration_seconds;
            table.add_row(vec![
                e.id.to_string(),
                e.task_id.to_string(),
                format!("{} ({})", e.employee_name, e.employee_id),
                short_ts(&e.start_time),
                short_ts(&e.end_time),
                format_hms(e.duration_seconds),
                or_dash(Some(e.memo.as_str())),
            ]);
        }
        print!("{}", table.render());

        if let Some(task_id) = task {
            println!(
                "\nTask #{} total: {}",
                task_id,
                format_hm(Ledger::total_for_task(&pool.conn, *task_id)?)
            );
        } else {
            println!("\nTotal: {}", format_hm(total));
        }
    }

    Ok(())
}
