use anyhow::Result;
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use semcal_core::config::SemcalConfig;
use semcal_core::source::Agenda;
use semcal_core::{CalendarGrid, Event, TypeFilter, ViewMode, ViewState};
use serde::Serialize;

use crate::render::{Render, render_grid};

pub struct GridOptions {
    pub mode: ViewMode,
    pub date: Option<String>,
    pub types: Vec<String>,
    pub select: Option<String>,
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonView<'a> {
    title: String,
    state: &'a ViewState,
    grid: &'a CalendarGrid<'a>,
    selected: Option<&'a Event>,
}

pub fn run(config: &SemcalConfig, agenda: &Agenda, options: GridOptions) -> Result<()> {
    let today = Local::now().date_naive();
    let reference = match options.date.as_deref() {
        Some(s) => parse_reference_date(s, options.mode)?,
        None => today,
    };

    for name in &options.types {
        if !config.is_known_type(name) {
            eprintln!(
                "{} unknown event type '{}' (add it to event_types in the config to silence this)",
                "warning:".yellow().bold(),
                name
            );
        }
    }

    let filter: TypeFilter = options.types.iter().map(String::as_str).collect();
    let mut state = ViewState::new(reference, options.mode).with_filter(filter);
    if let Some(id) = options.select {
        state = state.select(id);
    }

    let grid = state.grid(&agenda.events, &agenda.cycles);
    let selected = state.selected(&agenda.events);

    if options.json {
        let view = JsonView {
            title: state.title(),
            state: &state,
            grid: &grid,
            selected,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", render_grid(&state, &grid, today));

    if let Some(id) = state.selected_event.as_deref() {
        match selected {
            Some(event) => println!("\n{}", event.render()),
            None => eprintln!("{} no event with id '{}'", "warning:".yellow().bold(), id),
        }
    }

    Ok(())
}

/// Parse `--date`. Month view also accepts `YYYY-MM`.
pub fn parse_reference_date(s: &str, mode: ViewMode) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if mode == ViewMode::Month {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return Ok(date);
        }
        anyhow::bail!("Invalid date '{}'. Expected YYYY-MM or YYYY-MM-DD", s);
    }

    anyhow::bail!("Invalid date '{}'. Expected YYYY-MM-DD", s)
}
