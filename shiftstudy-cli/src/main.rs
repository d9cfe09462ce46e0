//! ShiftStudy CLI - student planner in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shiftstudy_core::services::{LogEvent, LoggingService};

mod commands;
mod output;

use commands::{
    get_logger, home, log_event, login, logs, quote, register, schedule, settings, tasks, AuthArgs,
};

/// ShiftStudy - tasks, schedule and motivation for students
#[derive(Parser)]
#[command(name = "shiftstudy", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        /// Account email
        #[arg(long, env = "SHIFTSTUDY_EMAIL")]
        email: Option<String>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check credentials and show a summary
    Login {
        #[command(flatten)]
        auth: AuthArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dashboard: counts, today, upcoming and a quote
    Home {
        #[command(flatten)]
        auth: AuthArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        command: tasks::TasksCommands,
    },

    /// This week's schedule, Monday to Sunday
    Schedule {
        #[command(flatten)]
        auth: AuthArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a motivational quote
    Quote {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Command name as recorded in the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Home { .. } => "home",
            Commands::Tasks { command } => match command {
                tasks::TasksCommands::List { .. } => "tasks list",
                tasks::TasksCommands::Add { .. } => "tasks add",
                tasks::TasksCommands::Edit { .. } => "tasks edit",
                tasks::TasksCommands::Toggle { .. } => "tasks toggle",
                tasks::TasksCommands::Remove { .. } => "tasks remove",
            },
            Commands::Schedule { .. } => "schedule",
            Commands::Quote { .. } => "quote",
            Commands::Settings { .. } => "settings",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    let logger = get_logger();
    if let Some(l) = &logger {
        let _ = l.log_command(name);
    }

    match run(cli, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new(failure_event(&e))
                    .with_command(name)
                    .with_error(e.to_string()),
            );
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Event name for a failed command; store failures are kept apart
fn failure_event(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<shiftstudy_core::Error>() {
        Some(e) if e.is_storage() => "storage_failed",
        _ => "command_failed",
    }
}

fn run(cli: Cli, logger: &Option<LoggingService>) -> Result<()> {
    match cli.command {
        Commands::Register { email, name, json } => register::run(email, name, json),
        Commands::Login { auth, json } => login::run(auth, json),
        Commands::Home { auth, json } => home::run(auth, json, logger),
        Commands::Tasks { command } => tasks::run(command),
        Commands::Schedule { auth, json } => schedule::run(auth, json),
        Commands::Quote { json } => quote::run(json, logger),
        Commands::Settings { command } => settings::run(command),
        Commands::Logs { command } => logs::run(command, logger),
    }
}
