pub mod config;
pub mod grid;
pub mod show;

use std::path::Path;

use anyhow::{Context, Result};
use semcal_core::source::{Agenda, source_for};

/// Load the agenda from a .json/.ics file or a directory of .ics files.
pub fn load_agenda(path: &Path) -> Result<Agenda> {
    if !path.exists() {
        anyhow::bail!(
            "No events found at {}.\n\n\
            Point semcal at an export with:\n  \
            semcal --file <events.json|calendar.ics> month\n\n\
            or set `events_file` in {}",
            path.display(),
            semcal_core::config::SemcalConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        );
    }

    let source = source_for(path)?;
    source
        .fetch()
        .with_context(|| format!("Could not load events from {}", source.describe()))
}
