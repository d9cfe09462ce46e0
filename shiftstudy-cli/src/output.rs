//! Output formatting utilities

use chrono::{Local, TimeZone};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use shiftstudy_core::Task;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Local calendar date of an epoch-millisecond timestamp
pub fn format_date(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%a %d %b %Y").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Due time, or "All day"
pub fn format_time(task: &Task) -> String {
    task.due_time
        .clone()
        .unwrap_or_else(|| "All day".to_string())
}

fn priority_cell(priority: &str) -> Cell {
    let cell = Cell::new(priority);
    match priority {
        "High" => cell.fg(Color::Red),
        "Medium" => cell.fg(Color::Yellow),
        "Low" => cell.fg(Color::Green),
        _ => cell,
    }
}

fn status_cell(task: &Task) -> Cell {
    if task.is_completed {
        Cell::new("done").fg(Color::Green)
    } else {
        Cell::new("pending")
    }
}

/// Table of tasks with their due date
pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Due", "Time", "Title", "Subject", "Priority", "Status"]);
    for task in tasks {
        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(format_date(task.due_date)),
            Cell::new(format_time(task)),
            Cell::new(&task.title),
            Cell::new(&task.category),
            priority_cell(&task.priority),
            status_cell(task),
        ]);
    }
    table
}

/// Table of tasks within a single day
pub fn day_table(tasks: &[Task]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Time", "Title", "Subject", "Priority", "Status"]);
    for task in tasks {
        table.add_row(vec![
            Cell::new(format_time(task)),
            Cell::new(&task.title),
            Cell::new(&task.category),
            priority_cell(&task.priority),
            status_cell(task),
        ]);
    }
    table
}

/// Print a quote with its author
pub fn quote(content: &str, author: &str) {
    println!("{}", format!("\"{}\"", content).italic());
    println!("  {}", format!("- {}", author).dimmed());
}
