use std::path::PathBuf;
use std::time::Duration;

use agenda_core::EventStore;
use agenda_core::reminder::{FileSource, ReminderMode, SystemClock, spawn_poller};
use anyhow::Result;
use log::info;
use owo_colors::OwoColorize;

use crate::render::Render;

/// Run the reminder poller in the foreground until Ctrl-C.
///
/// The events file is re-read on every tick, so events added from another
/// terminal are picked up without restarting.
pub async fn run(events_path: PathBuf, interval: Duration, mode: ReminderMode) -> Result<()> {
    // refuse to start on a corrupt file rather than watching an empty table
    EventStore::load(&events_path)?;

    let (handle, mut reminders) =
        spawn_poller(FileSource::new(&events_path), SystemClock, interval, mode);

    println!(
        "{}",
        format!(
            "Watching {} for reminders ({} mode). Press Ctrl-C to stop.",
            events_path.display(),
            mode
        )
        .dimmed()
    );

    loop {
        tokio::select! {
            reminder = reminders.recv() => match reminder {
                Some(reminder) => println!("{}", reminder.render()),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping watch");
                break;
            }
        }
    }

    handle.stop().await;
    Ok(())
}
