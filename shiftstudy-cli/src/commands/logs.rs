//! Logs command - inspect and prune the local event log

use anyhow::Result;
use chrono::{Duration, Local, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use shiftstudy_core::services::{EntryPoint, LogEntry, LoggingService};

use super::get_data_dir;
use crate::output;

/// Events counted as failures in `logs stats`
const FAILURE_EVENTS: [&str; 3] = ["command_failed", "storage_failed", "quote_fallback"];

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only entries with an error message
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete events older than a number of days
    Clear {
        #[arg(long, default_value = "30")]
        days: u32,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Event counts by kind
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run a logs subcommand, reusing the process logger when it is open
pub fn run(command: LogsCommands, logger: &Option<LoggingService>) -> Result<()> {
    let opened;
    let service = match logger {
        Some(l) => l,
        None => {
            let data_dir = get_data_dir()?;
            std::fs::create_dir_all(&data_dir)?;
            opened = LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;
            &opened
        }
    };

    match command {
        LogsCommands::List {
            limit,
            errors,
            json,
        } => list(service, limit, errors, json),
        LogsCommands::Clear { days, force, json } => clear(service, days, force, json),
        LogsCommands::Stats { json } => stats(service, json),
    }
}

fn list(service: &LoggingService, limit: usize, errors: bool, json: bool) -> Result<()> {
    let entries = if errors {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No events logged yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["When", "Event", "Command", "Error"]);
    for entry in &entries {
        table.add_row(vec![
            local_time(entry.timestamp),
            event_label(entry),
            entry.command.clone().unwrap_or_default(),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn clear(service: &LoggingService, days: u32, force: bool, json: bool) -> Result<()> {
    let cutoff = Utc::now() - Duration::days(i64::from(days));

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete events older than {} days?", days))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let deleted = service.delete_before(cutoff.timestamp_millis())?;
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        output::success(&format!("Removed {} events", deleted));
    }
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let by_event = service.count_by_event()?;
    let total: u64 = by_event.iter().map(|(_, n)| n).sum();
    let failures: u64 = by_event
        .iter()
        .filter(|(event, _)| FAILURE_EVENTS.contains(&event.as_str()))
        .map(|(_, n)| n)
        .sum();

    if json {
        let events: serde_json::Map<String, serde_json::Value> = by_event
            .iter()
            .map(|(event, n)| (event.clone(), serde_json::Value::from(*n)))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "total": total,
                "failures": failures,
                "events": events,
                "path": service.db_path().display().to_string(),
            }))?
        );
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Event", "Count"]);
    for (event, n) in &by_event {
        table.add_row(vec![event.clone(), n.to_string()]);
    }
    println!("{}", table);
    println!("  {} events, {} failures", total, failures);
    println!("  {}", service.db_path().display().to_string().dimmed());
    Ok(())
}

fn event_label(entry: &LogEntry) -> String {
    if FAILURE_EVENTS.contains(&entry.event.as_str()) {
        entry.event.red().to_string()
    } else {
        entry.event.clone()
    }
}

fn local_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%d %b %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}
