//! Tasks command - list, add, edit, toggle and remove tasks

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input};
use shiftstudy_core::domain::schedule::start_of_day;
use shiftstudy_core::domain::{normalize_due_time, PRIORITIES};
use shiftstudy_core::{Error, OperationResult, ShiftStudyContext, Task, TaskDraft, TaskFilter};

use super::{get_context, sign_in, AuthArgs};
use crate::output;

#[derive(Subcommand)]
pub enum TasksCommands {
    /// List tasks
    List {
        #[command(flatten)]
        auth: AuthArgs,
        /// all, pending or completed
        #[arg(long, default_value = "all")]
        filter: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a task
    Add {
        #[command(flatten)]
        auth: AuthArgs,
        /// Task title
        #[arg(long)]
        title: Option<String>,
        /// Subject, e.g. CP3406
        #[arg(long)]
        subject: Option<String>,
        /// Due date (YYYY-MM-DD, today or tomorrow)
        #[arg(long)]
        due: Option<String>,
        /// Due time (HH:MM); omit for all day
        #[arg(long)]
        time: Option<String>,
        #[arg(long, value_parser = PRIORITIES)]
        priority: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a task
    Edit {
        #[command(flatten)]
        auth: AuthArgs,
        /// Task ID
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        /// Due date (YYYY-MM-DD, today or tomorrow)
        #[arg(long)]
        due: Option<String>,
        /// Due time (HH:MM)
        #[arg(long, conflicts_with = "all_day")]
        time: Option<String>,
        /// Remove the due time
        #[arg(long)]
        all_day: bool,
        #[arg(long, value_parser = PRIORITIES)]
        priority: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task done, or not done
    Toggle {
        #[command(flatten)]
        auth: AuthArgs,
        /// Task ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a task
    Remove {
        #[command(flatten)]
        auth: AuthArgs,
        /// Task ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: TasksCommands) -> Result<()> {
    match command {
        TasksCommands::List { auth, filter, json } => run_list(auth, &filter, json),
        TasksCommands::Add {
            auth,
            title,
            subject,
            due,
            time,
            priority,
            description,
            json,
        } => {
            let ctx = get_context()?;
            let user = sign_in(&ctx, &auth)?;

            let title = prompt_if_missing(title, "Title", json)?;
            let subject = prompt_if_missing(subject, "Subject", json)?;
            let due = prompt_if_missing(due, "Due date (YYYY-MM-DD)", json)?;
            let due_date = if due.trim().is_empty() {
                None
            } else {
                Some(parse_due_date(&due)?)
            };

            let draft = TaskDraft {
                title,
                subject,
                description: description.unwrap_or_default(),
                due_date,
                due_time: time,
                priority,
            };
            let task = draft.into_task(user.id)?;
            ctx.task_service.add_task(&task)?;

            report(&ctx, json, "Task added")
        }
        TasksCommands::Edit {
            auth,
            id,
            title,
            subject,
            due,
            time,
            all_day,
            priority,
            description,
            json,
        } => {
            let ctx = get_context()?;
            sign_in(&ctx, &auth)?;
            let mut task = find_task(&ctx, id)?;

            if let Some(t) = title {
                task.title = t.trim().to_string();
            }
            if let Some(s) = subject {
                task.category = s.trim().to_string();
            }
            if let Some(d) = due {
                task.due_date = parse_due_date(&d)?;
            }
            if all_day {
                task.due_time = None;
            } else if let Some(t) = time {
                task.due_time = Some(normalize_due_time(&t)?);
            }
            if let Some(p) = priority {
                task.priority = p;
            }
            if let Some(d) = description {
                task.description = d.trim().to_string();
            }
            task.validate().map_err(Error::validation)?;

            ctx.task_service.update_task(&task)?;
            report(&ctx, json, "Task updated")
        }
        TasksCommands::Toggle { auth, id, json } => {
            let ctx = get_context()?;
            sign_in(&ctx, &auth)?;
            let task = find_task(&ctx, id)?;

            ctx.task_service.toggle_completion(&task)?;
            let message = if task.is_completed {
                "Task marked as pending"
            } else {
                "Task completed"
            };
            report(&ctx, json, message)
        }
        TasksCommands::Remove {
            auth,
            id,
            force,
            json,
        } => {
            let ctx = get_context()?;
            sign_in(&ctx, &auth)?;
            let task = find_task(&ctx, id)?;

            if !force && !json {
                println!("\n{}", format!("This will delete '{}'.", task.title).yellow());
                if !Confirm::new()
                    .with_prompt("Are you sure?")
                    .default(false)
                    .interact()?
                {
                    println!("{}\n", "Cancelled".dimmed());
                    return Ok(());
                }
            }

            ctx.task_service.delete_task(&task)?;
            report(&ctx, json, "Task deleted")
        }
    }
}

fn run_list(auth: AuthArgs, filter: &str, json: bool) -> Result<()> {
    let filter: TaskFilter = filter.parse()?;
    let ctx = get_context()?;
    sign_in(&ctx, &auth)?;

    let tasks = ctx.task_service.filtered(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("{}", output::task_table(&tasks));
    let counts = ctx.task_service.counts();
    println!(
        "{}",
        format!(
            "{} total, {} pending, {} completed",
            counts.total, counts.pending, counts.completed
        )
        .dimmed()
    );
    Ok(())
}

/// Task owned by the signed-in user
fn find_task(ctx: &ShiftStudyContext, id: i64) -> Result<Task> {
    ctx.task_service
        .find(id)
        .ok_or_else(|| Error::not_found(format!("task {}", id)))
        .context("No such task in your list")
}

fn prompt_if_missing(value: Option<String>, prompt: &str, json: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if json => Ok(String::new()),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

/// Start of the given local day in epoch milliseconds
fn parse_due_date(raw: &str) -> Result<i64> {
    let today = Local::now().date_naive();
    let date = match raw.trim().to_lowercase().as_str() {
        "today" => today,
        "tomorrow" => today + Duration::days(1),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| Error::validation(format!("Invalid date '{}'. Use YYYY-MM-DD", other)))?,
    };
    Ok(start_of_day(&Local, date).timestamp_millis())
}

fn report(ctx: &ShiftStudyContext, json: bool, message: &str) -> Result<()> {
    if json {
        let snapshot = ctx.task_service.snapshot();
        println!(
            "{}",
            serde_json::to_string_pretty(&OperationResult::ok(snapshot.tasks))?
        );
    } else {
        output::success(message);
    }
    Ok(())
}
