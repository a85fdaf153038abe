//! Terminal rendering for semcal-core types.
//!
//! Extension traits and helpers that turn a `CalendarGrid` into colored text
//! using owo_colors.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use semcal_core::layout::{CalendarCell, SpanningEvent, WeekRow, assign_lanes};
use semcal_core::{CalendarGrid, CyclePhase, Event, EventType, ViewState};

/// Characters per day column (including the separating space)
const COL_WIDTH: usize = 13;

/// Width of the week number gutter
const GUTTER: usize = 4;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventType {
    fn render(&self) -> String {
        paint(self, &format!("[{}]", self))
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut lines = vec![format!("{} {}", self.to_string().bold(), self.event_type.render())];

        let when = if self.is_single_day() {
            format!(
                "{} {} – {}",
                self.start.format("%a %b %-d, %Y"),
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )
        } else {
            format!(
                "{} → {}",
                self.start.format("%a %b %-d, %Y %H:%M"),
                self.end.format("%a %b %-d, %Y %H:%M")
            )
        };
        lines.push(format!("   {} {}", "when:".dimmed(), when));

        if let Some(location) = &self.location {
            lines.push(format!("   {} {}", "where:".dimmed(), location));
        }
        if !self.attendee_ids.is_empty() {
            lines.push(format!("   {} {}", "attendees:".dimmed(), self.attendee_ids.join(", ")));
        }
        if let Some(description) = &self.description {
            lines.push(String::new());
            lines.extend(description.lines().map(|l| format!("   {l}")));
        }
        lines.push(format!("   {} {}", "id:".dimmed(), self.id.dimmed()));

        lines.join("\n")
    }
}

/// Color text according to the event type
fn paint(event_type: &EventType, text: &str) -> String {
    match event_type {
        EventType::Meeting => text.blue().to_string(),
        EventType::Workshop => text.magenta().to_string(),
        EventType::Training => text.cyan().to_string(),
        EventType::Planting => text.green().to_string(),
        EventType::Market => text.yellow().to_string(),
        EventType::Other(_) => text.to_string(),
    }
}

/// Render the whole grid: title, weekday header, then each week row.
pub fn render_grid(state: &ViewState, grid: &CalendarGrid<'_>, today: NaiveDate) -> String {
    let mut lines = vec![state.title().bold().to_string()];

    let header: String = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .iter()
        .map(|d| fit(d, COL_WIDTH))
        .collect();
    lines.push(format!("{}{}", " ".repeat(GUTTER), header.dimmed()));

    for (cells, week) in grid.rows() {
        render_week(cells, week, today, &mut lines);
    }

    if grid.cells.iter().any(|c| c.cycle_phase.is_some()) {
        lines.push(format!(
            "{}{} work cycle  {} cooldown",
            " ".repeat(GUTTER),
            "•".green(),
            "○".yellow()
        ));
    }

    if !state.type_filter.is_empty() {
        let types: Vec<String> = state.type_filter.iter().map(|t| t.render()).collect();
        lines.push(format!("{}{} {}", " ".repeat(GUTTER), "filter:".dimmed(), types.join(" ")));
    }

    lines.join("\n")
}

fn render_week(cells: &[CalendarCell<'_>], week: &WeekRow<'_>, today: NaiveDate, lines: &mut Vec<String>) {
    lines.push(String::new());

    // Day numbers
    let mut day_line = fit(&format!("W{:02}", week.iso_week), GUTTER).dimmed().to_string();
    for cell in cells {
        day_line.push_str(&render_day_label(cell, today));
    }
    lines.push(day_line);

    // Multi-day bars, one line per lane
    let lanes = assign_lanes(&week.spanning);
    let lane_count = lanes.iter().max().map_or(0, |max| max + 1);
    for lane in 0..lane_count {
        let spans: Vec<&SpanningEvent<'_>> = week
            .spanning
            .iter()
            .zip(&lanes)
            .filter(|(_, l)| **l == lane)
            .map(|(span, _)| span)
            .collect();
        lines.push(format!("{}{}", " ".repeat(GUTTER), render_lane(&spans)));
    }

    // Single-day events, one line per slot
    let depth = cells.iter().map(|c| c.single_day_events.len()).max().unwrap_or(0);
    for slot in 0..depth {
        let mut line = " ".repeat(GUTTER);
        for cell in cells {
            match cell.single_day_events.get(slot) {
                Some(event) => {
                    let text = fit(&format!("{} {}", event.start.format("%H:%M"), event), COL_WIDTH - 1);
                    line.push_str(&paint(&event.event_type, &text));
                    line.push(' ');
                }
                None => line.push_str(&" ".repeat(COL_WIDTH)),
            }
        }
        lines.push(line.trim_end().to_string());
    }
}

fn render_day_label(cell: &CalendarCell<'_>, today: NaiveDate) -> String {
    let marker = match cell.cycle_phase {
        Some(CyclePhase::Work) => "•".green().to_string(),
        Some(CyclePhase::Cooldown) => "○".yellow().to_string(),
        None => " ".to_string(),
    };

    let number = format!("{:>2}", cell.date.day());
    let number = if cell.date == today {
        number.reversed().to_string()
    } else if !cell.is_current_month {
        number.dimmed().to_string()
    } else {
        number
    };

    // Two digits + marker, padded to the column width
    format!("{}{}{}", number, marker, " ".repeat(COL_WIDTH - 3))
}

/// One lane of bars. Spans in a lane never overlap and arrive sorted by column.
fn render_lane(spans: &[&SpanningEvent<'_>]) -> String {
    let mut line = String::new();
    let mut col = 0;

    for span in spans {
        if span.start_col > col {
            line.push_str(&" ".repeat((span.start_col - col) * COL_WIDTH));
        }
        line.push_str(&paint(&span.event.event_type, &bar_text(span)));
        line.push(' ');
        col = span.end_col + 1;
    }

    line.trim_end().to_string()
}

/// Bar text for a span, exactly `span_days * COL_WIDTH - 1` characters wide.
/// `◀`/`▶` mark a bar cut at the week boundary.
fn bar_text(span: &SpanningEvent<'_>) -> String {
    let width = span.span_days * COL_WIDTH - 1;
    let left = if span.continues_from_prev_week { '◀' } else { '[' };
    let right = if span.continues_to_next_week { '▶' } else { ']' };

    let inner_width = width.saturating_sub(2);
    let title = fit(&format!(" {} ", span.event), inner_width);
    let inner = title.trim_end();
    let fill = inner_width.saturating_sub(inner.chars().count());

    format!("{left}{inner}{}{right}", "─".repeat(fill))
}

/// Pad or truncate `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{text}{}", " ".repeat(width - count));
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}
