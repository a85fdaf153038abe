use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use super::{CalendarCell, CalendarGrid, DAYS_PER_WEEK, MONTH_GRID_CELLS, WeekRow};
use super::{single_day_events, spanning_events};
use crate::cycle::{Cycle, cycle_phase};
use crate::dates::{first_day_of_month, iso_week_number, monday_of_week, weekday_index_monday_first};
use crate::event::Event;
use crate::filter::TypeFilter;
use crate::view::ViewMode;

/// The 42 dates of the month grid for the month containing `anchor`,
/// each flagged with whether it belongs to that month.
///
/// The grid starts with the trailing days of the previous month needed to
/// reach the first Monday-first column, then the whole month, then enough
/// days of the next month to fill 6 rows.
pub fn month_dates(anchor: NaiveDate) -> Vec<(NaiveDate, bool)> {
    let first = first_day_of_month(anchor);
    let offset = i64::from(weekday_index_monday_first(first));
    let grid_start = first - Duration::days(offset);

    (0..MONTH_GRID_CELLS as i64)
        .map(|i| grid_start + Duration::days(i))
        .map(|date| {
            let in_month = date.year() == first.year() && date.month() == first.month();
            (date, in_month)
        })
        .collect()
}

/// Monday..Sunday of the week containing `reference`.
pub fn week_dates(reference: NaiveDate) -> Vec<NaiveDate> {
    let monday = monday_of_week(reference);
    (0..DAYS_PER_WEEK as i64)
        .map(|i| monday + Duration::days(i))
        .collect()
}

/// Month view: 42 cells and 6 week rows. Spanning events are computed per
/// row, so an event crossing three rows yields three independent records.
pub fn month_grid<'a>(
    events: &'a [Event],
    cycles: &[Cycle],
    anchor: NaiveDate,
    filter: &TypeFilter,
) -> CalendarGrid<'a> {
    let cells: Vec<CalendarCell<'a>> = month_dates(anchor)
        .into_iter()
        .map(|(date, in_month)| build_cell(events, cycles, date, in_month, filter))
        .collect();

    let weeks: Vec<WeekRow<'a>> = cells
        .chunks(DAYS_PER_WEEK)
        .map(|row| {
            let dates: Vec<NaiveDate> = row.iter().map(|c| c.date).collect();
            build_week_row(events, dates, filter)
        })
        .collect();

    debug!(
        month = %first_day_of_month(anchor).format("%Y-%m"),
        events = events.len(),
        spanning = weeks.iter().map(|w| w.spanning.len()).sum::<usize>(),
        "built month grid"
    );

    CalendarGrid {
        mode: ViewMode::Month,
        cells,
        weeks,
    }
}

/// Week view: the 7 days of the week containing `reference` and one row.
/// `is_current_month` is relative to the reference date's month.
pub fn week_grid<'a>(
    events: &'a [Event],
    cycles: &[Cycle],
    reference: NaiveDate,
    filter: &TypeFilter,
) -> CalendarGrid<'a> {
    let dates = week_dates(reference);

    let cells: Vec<CalendarCell<'a>> = dates
        .iter()
        .map(|&date| {
            let in_month = date.year() == reference.year() && date.month() == reference.month();
            build_cell(events, cycles, date, in_month, filter)
        })
        .collect();

    let week = build_week_row(events, dates, filter);

    debug!(
        week = week.iso_week,
        events = events.len(),
        spanning = week.spanning.len(),
        "built week grid"
    );

    CalendarGrid {
        mode: ViewMode::Week,
        cells,
        weeks: vec![week],
    }
}

fn build_cell<'a>(
    events: &'a [Event],
    cycles: &[Cycle],
    date: NaiveDate,
    is_current_month: bool,
    filter: &TypeFilter,
) -> CalendarCell<'a> {
    CalendarCell {
        date,
        is_current_month,
        single_day_events: single_day_events(events, date, filter),
        cycle_phase: cycle_phase(cycles, date),
    }
}

fn build_week_row<'a>(events: &'a [Event], dates: Vec<NaiveDate>, filter: &TypeFilter) -> WeekRow<'a> {
    let spanning = spanning_events(events, &dates, filter);
    let iso_week = dates.first().copied().map(iso_week_number).unwrap_or_default();

    WeekRow {
        dates,
        iso_week,
        spanning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::CyclePhase;
    use crate::event::EventType;
    use chrono::NaiveDateTime;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new("A", "Event A", EventType::Meeting, at(2024, 3, 5, 10), at(2024, 3, 5, 11)),
            Event::new("B", "Event B", EventType::Workshop, at(2024, 3, 4, 0), at(2024, 3, 8, 0)),
            Event::new("C", "Event C", EventType::Training, at(2024, 2, 28, 9), at(2024, 3, 6, 17)),
            Event::new("D", "Event D", EventType::Planting, at(2024, 3, 14, 8), at(2024, 3, 27, 18)),
        ]
    }

    #[test]
    fn test_month_grid_always_has_42_cells() {
        for year in [2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let dates = month_dates(date(year, month, 1));
                assert_eq!(dates.len(), 42, "{year}-{month}");

                let in_month = dates.iter().filter(|(_, current)| *current).count() as u32;
                assert_eq!(in_month, crate::dates::days_in_month(date(year, month, 1)));

                // Always starts on a Monday
                assert_eq!(weekday_index_monday_first(dates[0].0), 0);
            }
        }
    }

    #[test]
    fn test_february_2024_grid() {
        // Feb 1 2024 is a Thursday
        let dates = month_dates(date(2024, 2, 15));

        assert_eq!(dates[0], (date(2024, 1, 29), false));
        assert_eq!(dates[1], (date(2024, 1, 30), false));
        assert_eq!(dates[2], (date(2024, 1, 31), false));
        assert_eq!(dates[3], (date(2024, 2, 1), true));
        assert_eq!(dates[31], (date(2024, 2, 29), true));
        assert_eq!(dates[32], (date(2024, 3, 1), false));
        assert_eq!(dates[41], (date(2024, 3, 10), false));
    }

    #[test]
    fn test_month_starting_on_monday_has_no_leading_days() {
        // April 2024 starts on a Monday
        let dates = month_dates(date(2024, 4, 1));
        assert_eq!(dates[0], (date(2024, 4, 1), true));
        assert_eq!(dates[29], (date(2024, 4, 30), true));
        assert_eq!(dates[30], (date(2024, 5, 1), false));
    }

    #[test]
    fn test_week_dates() {
        let dates = week_dates(date(2024, 3, 7));
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], date(2024, 3, 4));
        assert_eq!(dates[6], date(2024, 3, 10));
    }

    #[test]
    fn test_month_grid_attaches_events_per_cell_and_row() {
        let events = sample_events();
        let grid = month_grid(&events, &[], date(2024, 3, 1), &TypeFilter::new());

        assert_eq!(grid.mode, ViewMode::Month);
        assert_eq!(grid.cells.len(), 42);
        assert_eq!(grid.weeks.len(), 6);

        let march_5 = grid.cell(date(2024, 3, 5)).unwrap();
        assert_eq!(march_5.single_day_events.len(), 1);
        assert_eq!(march_5.single_day_events[0].id, "A");

        // Row 1 is Mon Mar 4 - Sun Mar 10
        let row = &grid.weeks[1];
        assert_eq!(row.dates[0], date(2024, 3, 4));
        assert_eq!(row.iso_week, 10);
        let ids: Vec<_> = row.spanning.iter().map(|s| s.event.id.as_str()).collect();
        // Both start at column 0; B spans 5 days, C spans 3
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn test_event_across_rows_is_split_per_row() {
        let events = sample_events();
        let grid = month_grid(&events, &[], date(2024, 3, 1), &TypeFilter::new());

        let d_rows: Vec<_> = grid
            .weeks
            .iter()
            .filter_map(|w| w.spanning.iter().find(|s| s.event.id == "D"))
            .collect();

        // Thu Mar 14 - Wed Mar 27 crosses three rows
        assert_eq!(d_rows.len(), 3);
        assert_eq!((d_rows[0].start_col, d_rows[0].end_col), (3, 6));
        assert!(!d_rows[0].continues_from_prev_week);
        assert!(d_rows[0].continues_to_next_week);
        assert_eq!((d_rows[1].start_col, d_rows[1].end_col), (0, 6));
        assert!(d_rows[1].continues_from_prev_week && d_rows[1].continues_to_next_week);
        assert_eq!((d_rows[2].start_col, d_rows[2].end_col), (0, 2));
        assert!(d_rows[2].continues_from_prev_week);
        assert!(!d_rows[2].continues_to_next_week);
    }

    #[test]
    fn test_rows_cover_exactly_the_occupied_days() {
        let events = sample_events();
        let grid = month_grid(&events, &[], date(2024, 3, 1), &TypeFilter::new());

        for event in events.iter().filter(|e| !e.is_single_day()) {
            let covered: BTreeSet<NaiveDate> = grid
                .weeks
                .iter()
                .flat_map(|w| {
                    w.spanning
                        .iter()
                        .filter(|s| s.event.id == event.id)
                        .flat_map(move |s| w.dates[s.start_col..=s.end_col].iter().copied())
                })
                .collect();

            let expected: BTreeSet<NaiveDate> = grid
                .cells
                .iter()
                .map(|c| c.date)
                .filter(|d| event.occupies(*d))
                .collect();

            assert_eq!(covered, expected, "event {}", event.id);
        }
    }

    #[test]
    fn test_each_event_drawn_by_exactly_one_path() {
        let events = sample_events();
        let grid = month_grid(&events, &[], date(2024, 3, 1), &TypeFilter::new());

        for (cells, week) in grid.rows() {
            for (col, cell) in cells.iter().enumerate() {
                for event in events.iter().filter(|e| e.occupies(cell.date)) {
                    let as_single = cell.single_day_events.iter().any(|e| e.id == event.id);
                    let as_span = week
                        .spanning
                        .iter()
                        .any(|s| s.event.id == event.id && s.start_col <= col && col <= s.end_col);
                    assert!(as_single ^ as_span, "event {} on {}", event.id, cell.date);
                }
            }
        }
    }

    #[test]
    fn test_grid_is_idempotent() {
        let events = sample_events();
        let filter: TypeFilter = ["workshop", "planting"].into_iter().collect();

        let first = month_grid(&events, &[], date(2024, 3, 1), &filter);
        let second = month_grid(&events, &[], date(2024, 3, 1), &filter);
        assert_eq!(first, second);

        let first = week_grid(&events, &[], date(2024, 3, 6), &filter);
        let second = week_grid(&events, &[], date(2024, 3, 6), &filter);
        assert_eq!(first, second);
    }

    #[test]
    fn test_week_grid() {
        let events = sample_events();
        let grid = week_grid(&events, &[], date(2024, 3, 6), &TypeFilter::new());

        assert_eq!(grid.mode, ViewMode::Week);
        assert_eq!(grid.cells.len(), 7);
        assert_eq!(grid.weeks.len(), 1);
        assert!(grid.cells.iter().all(|c| c.is_current_month));

        let c = grid.weeks[0].spanning.iter().find(|s| s.event.id == "C").unwrap();
        assert_eq!((c.start_col, c.end_col), (0, 2));
        assert!(c.continues_from_prev_week);
    }

    #[test]
    fn test_week_grid_across_months_flags_other_month_days() {
        // Week of Wed Jan 31 2024: Mon Jan 29 - Sun Feb 4
        let grid = week_grid(&[], &[], date(2024, 1, 31), &TypeFilter::new());
        let flags: Vec<_> = grid.cells.iter().map(|c| c.is_current_month).collect();
        assert_eq!(flags, vec![true, true, true, false, false, false, false]);
    }

    #[test]
    fn test_cells_carry_cycle_phase() {
        let cycles = vec![Cycle {
            name: Some("Cycle 2".into()),
            start: date(2024, 3, 4),
            end: date(2024, 3, 8),
            cooldown_start: date(2024, 3, 11),
            cooldown_end: date(2024, 3, 12),
        }];
        let grid = month_grid(&[], &cycles, date(2024, 3, 1), &TypeFilter::new());

        assert_eq!(grid.cell(date(2024, 3, 4)).unwrap().cycle_phase, Some(CyclePhase::Work));
        assert_eq!(grid.cell(date(2024, 3, 9)).unwrap().cycle_phase, None);
        assert_eq!(grid.cell(date(2024, 3, 12)).unwrap().cycle_phase, Some(CyclePhase::Cooldown));
    }

    #[test]
    fn test_grid_serializes_for_front_ends() {
        let events = sample_events();
        let grid = week_grid(&events, &[], date(2024, 3, 6), &TypeFilter::new());
        let value = serde_json::to_value(&grid).unwrap();

        assert_eq!(value["mode"], "week");
        assert_eq!(value["cells"][1]["date"], "2024-03-05");
        assert_eq!(value["cells"][1]["isCurrentMonth"], true);
        assert_eq!(value["cells"][1]["singleDayEvents"][0]["id"], "A");
        assert_eq!(value["weeks"][0]["spanning"][0]["startCol"], 0);
        assert_eq!(value["weeks"][0]["spanning"][0]["continuesToNextWeek"], false);
    }
}
