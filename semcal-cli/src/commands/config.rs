use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use semcal_core::EventType;
use semcal_core::config::SemcalConfig;

pub fn run(config: &SemcalConfig, events_path: &Path) -> Result<()> {
    let config_path = SemcalConfig::config_path()?;

    println!("{} {}", "config file:".dimmed(), config_path.display());
    println!("{} {}", "events file:".dimmed(), events_path.display());
    if !events_path.exists() {
        println!("             {}", "(does not exist yet)".yellow());
    }
    println!("{} {}", "default view:".dimmed(), config.default_view);

    let mut types: Vec<String> = EventType::KNOWN.iter().map(|t| t.to_string()).collect();
    types.extend(config.event_types.iter().cloned());
    println!("{} {}", "event types:".dimmed(), types.join(", "));

    Ok(())
}
