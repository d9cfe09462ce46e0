//! Settings command - show and change persisted preferences

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use shiftstudy_core::config::Config;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting
    ///
    /// Keys: audio.enabled, audio.volume, quote.url, quote.timeout
    Set {
        key: String,
        value: String,
    },
}

pub fn run(command: SettingsCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    match command {
        SettingsCommands::Show { json } => {
            let quote_api = config.effective_quote_api();

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "audioEnabled": config.preferences.audio_enabled,
                        "audioVolume": config.preferences.audio_volume,
                        "quoteApi": quote_api,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Settings".bold());
            let mut table = output::create_table();
            table.add_row(vec![
                "audio.enabled".to_string(),
                config.preferences.audio_enabled.to_string(),
            ]);
            table.add_row(vec![
                "audio.volume".to_string(),
                format!("{:.2}", config.preferences.audio_volume),
            ]);
            table.add_row(vec!["quote.url".to_string(), quote_api.base_url.clone()]);
            table.add_row(vec![
                "quote.timeout".to_string(),
                format!("{}s", quote_api.timeout_secs),
            ]);
            println!("{}", table);

            if quote_api != config.quote_api {
                output::warning("quote.url is overridden by SHIFTSTUDY_QUOTE_URL");
            }
        }
        SettingsCommands::Set { key, value } => {
            match key.as_str() {
                "audio.enabled" => config.set_audio_enabled(parse_bool(&value)?),
                "audio.volume" => {
                    let volume: f64 = value
                        .trim()
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Volume must be a number between 0 and 1"))?;
                    config.set_audio_volume(volume);
                }
                "quote.url" => config.set_quote_base_url(&value)?,
                "quote.timeout" => {
                    let secs: u64 = value
                        .trim()
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Timeout must be a whole number of seconds"))?;
                    config.set_quote_timeout(secs)?;
                }
                other => bail!(
                    "Unknown setting '{}'. Use audio.enabled, audio.volume, quote.url or quote.timeout",
                    other
                ),
            }

            config.save(&data_dir)?;
            output::success(&format!("Updated {}", key));
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("Expected on/off, got '{}'", other),
    }
}
