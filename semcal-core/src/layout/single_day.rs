use chrono::NaiveDate;

use crate::dates::is_same_calendar_day;
use crate::event::Event;
use crate::filter::TypeFilter;

/// Single-day events that fall on `date`, in input order.
///
/// Multi-day events are left to [`super::spanning_events`], so every event
/// is drawn by exactly one of the two.
pub fn single_day_events<'a>(
    events: &'a [Event],
    date: NaiveDate,
    filter: &TypeFilter,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|e| filter.matches(&e.event_type))
        .filter(|e| is_same_calendar_day(&e.start, &date) && is_same_calendar_day(&e.end, &date))
        .collect()
}
