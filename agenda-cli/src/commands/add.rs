use std::path::Path;

use agenda_core::{AgendaError, EventStore};
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::singleton;

pub fn run(events_path: &Path, title: &str, date: &str, time: &str, reminder: bool) -> Result<()> {
    let _lock = singleton::acquire_lock(events_path)?;
    let mut store = EventStore::load(events_path)?;

    match store.append(title, date, time, reminder) {
        Ok(event) => {
            println!("{}", "Event added successfully!".green());
            println!("  {}", event.render());
            Ok(())
        }
        Err(AgendaError::Validation(e)) => anyhow::bail!("{}: {}", e.heading(), e),
        Err(e) => Err(e.into()),
    }
}
