//! Calendar screen state: reference date, view mode, filters and selection.
//!
//! `ViewState` is a plain value. Every transition returns a new state, and the
//! grid is recomputed from scratch from the state plus the event list.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cycle::Cycle;
use crate::dates::{add_months, iso_week_number};
use crate::event::{Event, EventType};
use crate::filter::TypeFilter;
use crate::layout::{self, CalendarGrid, week_dates};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Month => ViewMode::Week,
            ViewMode::Week => ViewMode::Month,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Month => write!(f, "month"),
            ViewMode::Week => write!(f, "week"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            other => Err(format!("Unknown view mode '{other}'. Expected 'month' or 'week'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub reference_date: NaiveDate,
    pub mode: ViewMode,
    pub type_filter: TypeFilter,
    pub selected_event: Option<String>,
}

impl ViewState {
    pub fn new(reference_date: NaiveDate, mode: ViewMode) -> Self {
        ViewState {
            reference_date,
            mode,
            type_filter: TypeFilter::new(),
            selected_event: None,
        }
    }

    /// Next month or next week, depending on the mode.
    pub fn next(self) -> Self {
        self.shift(1)
    }

    /// Previous month or previous week, depending on the mode.
    pub fn previous(self) -> Self {
        self.shift(-1)
    }

    fn shift(self, direction: i32) -> Self {
        let reference_date = match self.mode {
            ViewMode::Month => add_months(self.reference_date, direction),
            ViewMode::Week => self.reference_date + Duration::days(7 * i64::from(direction)),
        };
        ViewState {
            reference_date,
            ..self
        }
    }

    /// Jump to `date` (usually today).
    pub fn today(self, date: NaiveDate) -> Self {
        ViewState {
            reference_date: date,
            ..self
        }
    }

    pub fn with_mode(self, mode: ViewMode) -> Self {
        ViewState { mode, ..self }
    }

    pub fn toggle_mode(self) -> Self {
        let mode = self.mode.toggled();
        self.with_mode(mode)
    }

    pub fn with_filter(self, type_filter: TypeFilter) -> Self {
        ViewState {
            type_filter,
            ..self
        }
    }

    pub fn toggle_type(mut self, event_type: EventType) -> Self {
        self.type_filter.toggle(event_type);
        self
    }

    pub fn clear_filters(mut self) -> Self {
        self.type_filter.clear();
        self
    }

    pub fn select(self, event_id: impl Into<String>) -> Self {
        ViewState {
            selected_event: Some(event_id.into()),
            ..self
        }
    }

    pub fn deselect(self) -> Self {
        ViewState {
            selected_event: None,
            ..self
        }
    }

    /// The event shown in the detail panel, if the selection still exists.
    pub fn selected<'a>(&self, events: &'a [Event]) -> Option<&'a Event> {
        let id = self.selected_event.as_deref()?;
        events.iter().find(|e| e.id == id)
    }

    /// Compute the grid for the current mode, date and filter.
    pub fn grid<'a>(&self, events: &'a [Event], cycles: &[Cycle]) -> CalendarGrid<'a> {
        match self.mode {
            ViewMode::Month => {
                layout::month_grid(events, cycles, self.reference_date, &self.type_filter)
            }
            ViewMode::Week => {
                layout::week_grid(events, cycles, self.reference_date, &self.type_filter)
            }
        }
    }

    /// Header label, e.g. "March 2024" or "Week 10 · Mar 4 – Mar 10, 2024".
    pub fn title(&self) -> String {
        match self.mode {
            ViewMode::Month => self.reference_date.format("%B %Y").to_string(),
            ViewMode::Week => {
                let dates = week_dates(self.reference_date);
                let (first, last) = (dates[0], dates[6]);
                let week = iso_week_number(first);

                if first.year() == last.year() {
                    format!(
                        "Week {} · {} – {}",
                        week,
                        first.format("%b %-d"),
                        last.format("%b %-d, %Y")
                    )
                } else {
                    format!(
                        "Week {} · {} – {}",
                        week,
                        first.format("%b %-d, %Y"),
                        last.format("%b %-d, %Y")
                    )
                }
            }
        }
    }
}
