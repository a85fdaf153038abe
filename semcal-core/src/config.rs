//! Global semcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CalError, CalResult};
use crate::event::EventType;
use crate::view::ViewMode;

static DEFAULT_EVENTS_FILE: &str = "~/semcal/events.json";

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

/// Global configuration at ~/.config/semcal/config.toml
///
/// Every key can be overridden with a `SEMCAL_` environment variable,
/// e.g. `SEMCAL_EVENTS_FILE=~/exports/events.json`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SemcalConfig {
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    #[serde(default)]
    pub default_view: ViewMode,

    /// Event types the organisation uses beyond the built-in ones
    #[serde(default)]
    pub event_types: Vec<String>,
}

impl Default for SemcalConfig {
    fn default() -> Self {
        SemcalConfig {
            events_file: default_events_file(),
            default_view: ViewMode::default(),
            event_types: Vec::new(),
        }
    }
}

impl SemcalConfig {
    pub fn config_path() -> CalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalError::Config("Could not determine config directory".into()))?
            .join("semcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/semcal/config.toml, writing a commented default file first
    /// if there is none.
    pub fn load() -> CalResult<Self> {
        Self::load_at(&Self::config_path()?, true)
    }

    /// Load `path`, first writing the commented default file there when it is
    /// missing and `bootstrap` is set.
    pub fn load_at(path: &Path, bootstrap: bool) -> CalResult<Self> {
        if bootstrap && !path.exists() {
            Self::create_default_config(path)?;
        }

        Self::load_from(path)
    }

    /// Load from an explicit file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> CalResult<Self> {
        let config: SemcalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("SEMCAL")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("event_types"),
            )
            .build()
            .map_err(|e| CalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalError::Config(e.to_string()))?;

        debug!(path = %path.display(), events_file = %config.events_file.display(), "loaded config");
        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalResult<()> {
        let contents = format!(
            "\
# semcal configuration

# Events export (.json), iCalendar file (.ics) or directory of .ics files:
# events_file = \"{}\"

# View shown when no subcommand option says otherwise (\"month\" or \"week\"):
# default_view = \"month\"

# Event types used by your organisation besides the built-in ones:
# event_types = [\"assembly\", \"harvest\"]
",
            DEFAULT_EVENTS_FILE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// `events_file` with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.events_file.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// True for built-in event types and the ones listed in `event_types`.
    pub fn is_known_type(&self, name: &str) -> bool {
        EventType::from(name).is_known()
            || self
                .event_types
                .iter()
                .any(|t| t.trim().eq_ignore_ascii_case(name.trim()))
    }
}
