use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::{Agenda, EventSource};
use crate::error::{CalError, CalResult};
use crate::event::Event;

/// Events (and optionally cycles) exported from the admin API as JSON.
///
/// Accepts either `{ "events": [...], "cycles": [...] }` or the bare event
/// list returned by `GET /events`.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a JSON document without touching the filesystem.
    ///
    /// The shape is decided from the top-level value, then the document is
    /// decoded again as that shape so errors keep their field and position.
    pub fn parse(content: &str) -> CalResult<Agenda> {
        let value: Value = serde_json::from_str(content).map_err(parse_error)?;

        let agenda = match value {
            Value::Object(_) => serde_json::from_str::<Agenda>(content).map_err(parse_error)?,
            Value::Array(_) => Agenda {
                events: serde_json::from_str::<Vec<Event>>(content).map_err(parse_error)?,
                cycles: Vec::new(),
            },
            other => {
                return Err(CalError::Parse(format!(
                    "expected an object with \"events\" or a list of events, found {}",
                    kind(&other)
                )));
            }
        };

        agenda.validate()?;
        Ok(agenda)
    }
}

fn parse_error(e: serde_json::Error) -> CalError {
    CalError::Parse(e.to_string())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl EventSource for JsonFileSource {
    fn fetch(&self) -> CalResult<Agenda> {
        let content = std::fs::read_to_string(&self.path)?;
        let agenda = Self::parse(&content).map_err(|e| match e {
            CalError::Parse(msg) => CalError::Parse(format!("{}: {msg}", self.path.display())),
            other => other,
        })?;

        debug!(
            path = %self.path.display(),
            events = agenda.events.len(),
            cycles = agenda.cycles.len(),
            "loaded JSON agenda"
        );

        Ok(agenda)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
