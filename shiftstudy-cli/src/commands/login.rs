//! Login command - check credentials and show a short summary

use anyhow::Result;
use shiftstudy_core::services::AuthState;
use shiftstudy_core::OperationResult;

use super::{get_context, sign_in, AuthArgs};
use crate::output;

pub fn run(auth: AuthArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = sign_in(&ctx, &auth)?;
    let counts = ctx.task_service.counts();

    if json {
        let mut context = std::collections::HashMap::new();
        context.insert("counts".to_string(), serde_json::to_value(counts)?);
        println!(
            "{}",
            serde_json::to_string_pretty(&OperationResult::ok_with_context(&user, context))?
        );
        return Ok(());
    }

    if let AuthState::Success(message) = ctx.auth_service.state() {
        output::success(&message);
    }
    println!("  Welcome back, {}", user.name);
    println!(
        "  {} tasks, {} pending, {} completed",
        counts.total, counts.pending, counts.completed
    );
    Ok(())
}
