//! Schedule command - this week's tasks, Monday to Sunday

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use super::{get_context, sign_in, AuthArgs};
use crate::output;

pub fn run(auth: AuthArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    sign_in(&ctx, &auth)?;

    let now = Local::now();
    let week = ctx.task_service.week(&now);

    if json {
        println!("{}", serde_json::to_string_pretty(&week)?);
        return Ok(());
    }

    let today = now.date_naive();
    for bucket in &week {
        let heading = format!("{} {}", bucket.weekday_label(), bucket.date.format("%d %b"));
        if bucket.date == today {
            println!("{}", heading.bold().cyan());
        } else {
            println!("{}", heading.bold());
        }

        if bucket.tasks.is_empty() {
            println!("  {}", "No tasks".dimmed());
        } else {
            println!("{}", output::day_table(&bucket.tasks));
        }
    }
    Ok(())
}
