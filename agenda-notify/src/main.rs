//! Background service that raises desktop notifications for due reminders.
//!
//! Reads the events file on every check, so it can run alongside `agenda`
//! without sharing memory with it.

use std::path::PathBuf;

use agenda_core::EventStore;
use agenda_core::config::AgendaConfig;
use agenda_core::reminder::{
    Clock, FileSource, Reminder, ReminderMode, ReminderPoller, SystemClock, spawn_poller,
};
use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use notify_rust::{Notification, Timeout};

#[derive(Parser)]
#[command(name = "agenda-notify")]
#[command(about = "Show desktop notifications when agenda reminders are due")]
struct Args {
    /// Events file to watch instead of the configured one
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Check once and exit
    #[arg(long)]
    once: bool,

    /// Also fire reminders whose minute was missed between checks
    #[arg(long)]
    catch_up: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AgendaConfig::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.log_level),
    )
    .init();

    let events_path = args.file.unwrap_or_else(|| config.events_path());
    let mode = if args.catch_up {
        ReminderMode::CatchUp
    } else {
        config.reminder_mode
    };

    if args.once {
        let store = EventStore::load(&events_path)?;
        let now = SystemClock.now();
        for reminder in ReminderPoller::new(mode).tick(now, store.events()) {
            notify(&reminder);
        }
        return Ok(());
    }

    // a corrupt file at startup is fatal; later reload failures are not
    EventStore::load(&events_path)?;
    info!("Watching {} for reminders", events_path.display());

    let (handle, mut reminders) = spawn_poller(
        FileSource::new(&events_path),
        SystemClock,
        config.poll_interval(),
        mode,
    );

    loop {
        tokio::select! {
            reminder = reminders.recv() => match reminder {
                Some(reminder) => notify(&reminder),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop().await;
    info!("agenda-notify stopped");
    Ok(())
}

fn notify(reminder: &Reminder) {
    let result = Notification::new()
        .summary("Reminder")
        .body(&reminder.message())
        .appname("agenda")
        .timeout(Timeout::Never)
        .show();

    match result {
        Ok(_) => info!("Notified: {}", reminder.title),
        Err(e) => warn!("Could not show notification for '{}': {}", reminder.title, e),
    }
}
