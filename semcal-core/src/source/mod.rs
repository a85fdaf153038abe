//! Loading events and cycles.
//!
//! The admin API owns events; here we only read them, either from a JSON
//! export of the API's responses or from iCalendar files. A source is a plain
//! request/response contract: `fetch` returns the data or an error, with no
//! retry policy.

mod ics;
mod json;

pub use ics::{IcsSource, parse_events};
pub use json::JsonFileSource;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cycle::Cycle;
use crate::error::{CalError, CalResult};
use crate::event::Event;

/// Everything the calendar screen needs from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Agenda {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub cycles: Vec<Cycle>,
}

impl Agenda {
    /// Check every event and cycle invariant. Fails on the first violation.
    pub fn validate(&self) -> CalResult<()> {
        for event in &self.events {
            event.validate()?;
        }
        for cycle in &self.cycles {
            cycle.validate()?;
        }
        Ok(())
    }
}

pub trait EventSource {
    /// Load and validate the agenda.
    fn fetch(&self) -> CalResult<Agenda>;

    /// Human-readable description, e.g. the file path.
    fn describe(&self) -> String;
}

/// Pick a source for `path`: a directory or `.ics` file is read as iCalendar,
/// a `.json` file as an API export.
pub fn source_for(path: &Path) -> CalResult<Box<dyn EventSource>> {
    if path.is_dir() {
        debug!(path = %path.display(), "using iCalendar directory source");
        return Ok(Box::new(IcsSource::new(path)));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("ics") => Ok(Box::new(IcsSource::new(path))),
        Some("json") => Ok(Box::new(JsonFileSource::new(path))),
        _ => Err(CalError::UnsupportedSource(format!(
            "{} (expected a .json file, a .ics file or a directory of .ics files)",
            path.display()
        ))),
    }
}
