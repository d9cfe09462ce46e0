//! Home command - dashboard with counts, today, upcoming and a quote

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use shiftstudy_core::services::LoggingService;

use super::{fetch_quote, get_context, sign_in, AuthArgs};
use crate::output;

pub fn run(auth: AuthArgs, json: bool, logger: &Option<LoggingService>) -> Result<()> {
    let ctx = get_context()?;
    let user = sign_in(&ctx, &auth)?;

    let now = Local::now();
    let counts = ctx.task_service.counts();
    let today = ctx.task_service.today(&now);
    let upcoming = ctx.task_service.upcoming(&now);
    let outcome = fetch_quote(&ctx, logger, !json)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user": user,
                "counts": counts,
                "today": today,
                "upcoming": upcoming,
                "quote": outcome.quote,
            }))?
        );
        return Ok(());
    }

    println!("{}", format!("Hello, {}", user.name).bold());
    println!("{}", now.format("%A %d %B %Y").to_string().dimmed());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Total tasks".to_string(), counts.total.to_string()]);
    table.add_row(vec!["Pending".to_string(), counts.pending.to_string()]);
    table.add_row(vec!["Completed".to_string(), counts.completed.to_string()]);
    println!("{}", table);
    println!();

    println!("{}", "Today".bold());
    if today.is_empty() {
        println!("  {}", "Nothing due today".dimmed());
    } else {
        println!("{}", output::day_table(&today));
    }
    println!();

    println!("{}", "Upcoming".bold());
    if upcoming.is_empty() {
        println!("  {}", "No upcoming tasks".dimmed());
    } else {
        println!("{}", output::task_table(&upcoming));
    }
    println!();

    output::quote(&outcome.quote.content, &outcome.quote.author);
    Ok(())
}
