//! Sync command - Force a refresh of the cached rules

use anyhow::Result;
use owo_colors::OwoColorize;

use super::utils;

/// Execute the sync command
pub fn execute() -> Result<()> {
    let mut service = utils::open_service()?;
    let outcome = service.sync(utils::now_ms())?;

    if outcome.is_offline {
        anyhow::bail!("Sync failed: rule source unreachable or returned an error");
    }

    println!(
        "{} {} rule(s) cached",
        "Synced:".green(),
        outcome.rules.len()
    );

    if let Some(ts) = outcome.last_sync {
        println!("Last sync: {}", utils::format_epoch_ms(ts));
    }

    Ok(())
}
