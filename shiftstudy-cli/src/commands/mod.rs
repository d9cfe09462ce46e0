//! CLI command implementations

pub mod home;
pub mod login;
pub mod logs;
pub mod quote;
pub mod register;
pub mod schedule;
pub mod settings;
pub mod tasks;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use shiftstudy_core::services::{EntryPoint, LogEvent, LoggingService, QuoteOutcome, QuoteSource};
use shiftstudy_core::{ShiftStudyContext, User};

/// Password source for non-interactive use (CI/testing)
pub const PASSWORD_ENV: &str = "SHIFTSTUDY_PASSWORD";

/// Credentials for commands that act on a user's tasks
///
/// There is no session: every such command signs in again.
#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Account email
    #[arg(long, env = "SHIFTSTUDY_EMAIL")]
    pub email: Option<String>,
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SHIFTSTUDY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".shiftstudy"))
        .context("Could not find home directory")
}

/// Open the context for the data directory
pub fn get_context() -> Result<ShiftStudyContext> {
    let data_dir = get_data_dir()?;
    ShiftStudyContext::new(&data_dir)
        .with_context(|| format!("Failed to open ShiftStudy data in {}", data_dir.display()))
}

/// Email from the flag/env, else prompt
pub fn resolve_email(email: Option<String>) -> Result<String> {
    match email {
        Some(e) => Ok(e),
        None => Ok(Input::<String>::new()
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?),
    }
}

/// Password from SHIFTSTUDY_PASSWORD, else a hidden prompt
pub fn read_password(prompt: &str) -> Result<String> {
    if let Ok(p) = std::env::var(PASSWORD_ENV) {
        return Ok(p);
    }
    Ok(Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?)
}

/// Password and its re-typed copy for signup
///
/// Mismatches are reported by signup validation, not here.
pub fn read_new_password() -> Result<(String, String)> {
    if let Ok(p) = std::env::var(PASSWORD_ENV) {
        return Ok((p.clone(), p));
    }
    let password = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    let retype = Password::new()
        .with_prompt("Re-type password")
        .allow_empty_password(true)
        .interact()?;
    Ok((password, retype))
}

/// Sign in and load the user's tasks into the context
pub fn sign_in(ctx: &ShiftStudyContext, auth: &AuthArgs) -> Result<User> {
    let email = resolve_email(auth.email.clone())?;
    let password = read_password("Password")?;
    Ok(ctx.sign_in(&email, &password)?)
}

/// Run a future to completion on a single-threaded runtime
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Fetch the dashboard quote, with a spinner unless output is JSON
///
/// A masked remote failure is logged, never shown.
pub fn fetch_quote(
    ctx: &ShiftStudyContext,
    logger: &Option<LoggingService>,
    show_spinner: bool,
) -> Result<QuoteOutcome> {
    let spinner = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.set_message("Fetching quote...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome = block_on(ctx.quote_service.fetch_quote())?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if let QuoteSource::Fallback { reason } = &outcome.source {
        log_event(
            logger,
            LogEvent::new("quote_fallback")
                .with_error(reason.as_str())
                .with_error_details(ctx.quote_service.provider_name()),
        );
    }

    Ok(outcome)
}
