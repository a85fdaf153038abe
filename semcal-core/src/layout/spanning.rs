use chrono::NaiveDate;
use tracing::trace;

use super::SpanningEvent;
use crate::event::Event;
use crate::filter::TypeFilter;

/// Multi-day events overlapping `week_dates`, clipped to the week.
///
/// `week_dates` is normally Monday..Sunday. The week runs from the first
/// date at 00:00 to the last date at 23:59:59.999; since events are compared
/// by calendar date, that is the same as comparing against the first and
/// last dates.
///
/// The result is sorted by `start_col`, longer spans first on ties, so bars
/// stack the same way on every render.
pub fn spanning_events<'a>(
    events: &'a [Event],
    week_dates: &[NaiveDate],
    filter: &TypeFilter,
) -> Vec<SpanningEvent<'a>> {
    let (Some(&week_start), Some(&week_end)) = (week_dates.first(), week_dates.last()) else {
        return Vec::new();
    };

    let mut spanning: Vec<SpanningEvent<'a>> = events
        .iter()
        .filter(|e| filter.matches(&e.event_type))
        .filter_map(|event| {
            let start_day = event.start_day();
            let end_day = event.end_day();

            // Single-day events belong to the day cells
            if start_day == end_day {
                return None;
            }

            if end_day < week_start || start_day > week_end {
                return None;
            }

            let mut covered = week_dates
                .iter()
                .enumerate()
                .filter(|(_, day)| start_day <= **day && **day <= end_day)
                .map(|(col, _)| col);

            let Some(start_col) = covered.next() else {
                trace!(event = %event.id, "overlaps week but covers no slot, dropped");
                return None;
            };
            let end_col = covered.last().unwrap_or(start_col);

            Some(SpanningEvent {
                event,
                start_col,
                end_col,
                span_days: end_col - start_col + 1,
                continues_from_prev_week: start_day < week_start,
                continues_to_next_week: end_day > week_end,
            })
        })
        .collect();

    // Stable: equal keys keep input order
    spanning.sort_by(|a, b| {
        a.start_col
            .cmp(&b.start_col)
            .then_with(|| b.span_days.cmp(&a.span_days))
    });

    spanning
}

/// Assign each spanning event a lane (vertical slot) so that bars in the same
/// lane never share a column. Lanes are filled first-fit in the given order,
/// so passing the output of [`spanning_events`] puts longer bars on top.
pub fn assign_lanes(spanning: &[SpanningEvent<'_>]) -> Vec<usize> {
    // Last column used by each lane so far
    let mut lane_ends: Vec<usize> = Vec::new();

    spanning
        .iter()
        .map(|span| {
            let lane = match lane_ends.iter().position(|end| *end < span.start_col) {
                Some(lane) => lane,
                None => {
                    lane_ends.push(span.end_col);
                    lane_ends.len() - 1
                }
            };
            lane_ends[lane] = span.end_col;
            lane
        })
        .collect()
}
