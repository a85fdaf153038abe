//! Calendar layout engine.
//!
//! Everything here is a pure function of its inputs: events, cycles, a date
//! range and a type filter go in, a render-ready grid comes out. Nothing is
//! cached between calls.

mod grid;
mod single_day;
mod spanning;

pub use grid::{month_dates, month_grid, week_dates, week_grid};
pub use single_day::single_day_events;
pub use spanning::{assign_lanes, spanning_events};

use chrono::NaiveDate;
use serde::Serialize;

use crate::cycle::CyclePhase;
use crate::event::Event;
use crate::view::ViewMode;

/// Number of cells in a month grid (6 rows of 7 days).
pub const MONTH_GRID_CELLS: usize = 42;

/// Days per week row.
pub const DAYS_PER_WEEK: usize = 7;

/// One day of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell<'a> {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months
    pub is_current_month: bool,
    pub single_day_events: Vec<&'a Event>,
    pub cycle_phase: Option<CyclePhase>,
}

/// A multi-day event clipped to one week row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanningEvent<'a> {
    pub event: &'a Event,
    /// First column (0 = Monday) covered in this row
    pub start_col: usize,
    /// Last column covered in this row, inclusive
    pub end_col: usize,
    pub span_days: usize,
    /// The event started before this row's Monday
    pub continues_from_prev_week: bool,
    /// The event ends after this row's Sunday
    pub continues_to_next_week: bool,
}

/// Seven consecutive dates and the multi-day events crossing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRow<'a> {
    pub dates: Vec<NaiveDate>,
    pub iso_week: u32,
    pub spanning: Vec<SpanningEvent<'a>>,
}

/// A month (42 cells, 6 rows) or week (7 cells, 1 row) ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid<'a> {
    pub mode: ViewMode,
    pub cells: Vec<CalendarCell<'a>>,
    pub weeks: Vec<WeekRow<'a>>,
}

impl<'a> CalendarGrid<'a> {
    /// Cells of each week paired with that week's row.
    pub fn rows(&self) -> impl Iterator<Item = (&[CalendarCell<'a>], &WeekRow<'a>)> {
        self.cells.chunks(DAYS_PER_WEEK).zip(self.weeks.iter())
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell<'a>> {
        self.cells.iter().find(|c| c.date == date)
    }
}
