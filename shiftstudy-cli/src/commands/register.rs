//! Register command - create a local account

use anyhow::Result;
use dialoguer::Input;
use shiftstudy_core::services::{AuthState, SignupForm};
use shiftstudy_core::OperationResult;

use super::{get_context, read_new_password, resolve_email};
use crate::output;

pub fn run(email: Option<String>, name: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Name")
            .allow_empty(true)
            .interact_text()?,
    };
    let email = resolve_email(email)?;
    let (password, retype_password) = read_new_password()?;

    let form = SignupForm {
        name,
        email,
        password,
        retype_password,
    };
    let user = ctx.auth_service.submit_signup(&form)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&user))?);
        return Ok(());
    }

    if let AuthState::Success(message) = ctx.auth_service.state() {
        output::success(&message);
    }
    println!("  Welcome, {} (user #{})", user.name, user.id);
    Ok(())
}
