use std::path::Path;

use agenda_core::EventStore;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(events_path: &Path) -> Result<()> {
    let store = EventStore::load(events_path)?;
    let events = store.sorted_view();

    if events.is_empty() {
        println!("{}", "No events scheduled".dimmed());
        return Ok(());
    }

    println!("{}", "Scheduled Events:".bold());
    for event in &events {
        println!("  {}", event.render());
    }

    Ok(())
}
