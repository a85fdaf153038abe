use anyhow::Result;
use semcal_core::ViewState;
use semcal_core::source::Agenda;

use crate::render::Render;

pub fn run(agenda: &Agenda, id: &str) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let state = ViewState::new(today, Default::default()).select(id);

    let Some(event) = state.selected(&agenda.events) else {
        anyhow::bail!(
            "Event '{}' not found ({} events loaded)",
            id,
            agenda.events.len()
        );
    };

    println!("{}", event.render());
    Ok(())
}
