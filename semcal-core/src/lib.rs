//! Core types and layout engine for semcal.
//!
//! This crate provides everything the `semcal` CLI (or any other front end) needs
//! to turn a list of events into a render-ready calendar:
//! - `event` / `cycle` for the data model
//! - `layout` for the month/week grid and multi-day span computation
//! - `view` for the navigation/filter/selection state of a calendar screen
//! - `source` for loading events from JSON or .ics files
//! - `config` for the global configuration file

pub mod config;
pub mod cycle;
pub mod dates;
pub mod error;
pub mod event;
pub mod filter;
pub mod layout;
pub mod source;
pub mod view;

// Re-export the types most callers need at crate root for convenience
pub use cycle::{Cycle, CyclePhase};
pub use error::{CalError, CalResult};
pub use event::{Event, EventType};
pub use filter::TypeFilter;
pub use layout::{CalendarCell, CalendarGrid, SpanningEvent, WeekRow};
pub use view::{ViewMode, ViewState};
