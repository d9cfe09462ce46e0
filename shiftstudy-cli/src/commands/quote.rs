//! Quote command - print a motivational quote

use anyhow::Result;
use shiftstudy_core::services::LoggingService;

use super::{fetch_quote, get_context};
use crate::output;

pub fn run(json: bool, logger: &Option<LoggingService>) -> Result<()> {
    let ctx = get_context()?;
    let outcome = fetch_quote(&ctx, logger, !json)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.quote)?);
        return Ok(());
    }

    output::quote(&outcome.quote.content, &outcome.quote.author);
    Ok(())
}
