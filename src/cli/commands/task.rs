use super::{open_pool, print_json};
use crate::cli::parser::{Commands, TaskCmd};
use crate::config::Config;
use crate::db::{log, tasks};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::formatting::{or_dash, short_ts};
use crate::utils::table::Table;
use crate::utils::time::format_hm;

pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let Commands::Task { action } = cmd else {
        return Ok(());
    };
    let pool = open_pool(cfg)?;

    match action {
        TaskCmd::Add {
            title,
            assign,
            labels,
        } => {
            let id = tasks::insert_task(&pool.conn, title, assign, labels)?;
            log::ttlog(&pool.conn, "task", &id.to_string(), &format!("Added '{}'", title))?;

            let task = tasks::get_task(&pool.conn, id)?;
            if json {
                return print_json(&task);
            }
            success(format!("Task #{} added: {}", task.id, task.title));
        }

        TaskCmd::List { running } => {
            let list = if *running {
                tasks::list_running(&pool.conn)?
            } else {
                tasks::list_tasks(&pool.conn)?
            };
            if json {
                return print_json(&list);
            }
            if list.is_empty() {
                info("No tasks.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                "ID", "TITLE", "ASSIGNED", "STATUS", "TIMER", "LOGGED",
            ]);
            for t in &list {
                table.add_row(vec![
                    t.id.to_string(),
                    t.title.clone(),
                    t.assigned_to.clone(),
                    t.status.clone(),
                    or_dash(t.timer_started_at.as_deref().map(short_ts).as_deref()),
                    format_hm(t.logged_seconds),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
