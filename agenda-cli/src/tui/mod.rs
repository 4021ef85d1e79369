//! Interactive event form with live reminders.

mod app;
mod event;
mod ui;

use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;

use agenda_core::EventStore;
use agenda_core::config::AgendaConfig;
use agenda_core::reminder::{SystemClock, spawn_poller};
use anyhow::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::prelude::*;

use crate::singleton;
use app::App;
use event::{Event, EventHandler};

/// UI refresh rate
const TICK_RATE: Duration = Duration::from_millis(250);

pub async fn run(events_path: PathBuf, config: &AgendaConfig) -> Result<()> {
    let _lock = singleton::acquire_lock(&events_path)?;

    // load before touching the terminal so a corrupt file is reported plainly
    let store = EventStore::load(&events_path)?;
    info!("Starting agenda UI on {}", events_path.display());

    let (poller, reminders) = spawn_poller(
        store.subscribe(),
        SystemClock,
        config.poll_interval(),
        config.reminder_mode,
    );

    let mut terminal = start_terminal()?;
    let mut app = App::new(store);
    let mut events = EventHandler::new(TICK_RATE, reminders);

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    restore_terminal(&mut terminal)?;
    poller.stop().await;

    if let Err(e) = &result {
        error!("Application error: {}", e);
    }
    info!("agenda UI shutdown complete");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next().await {
            Some(Event::Key(key)) => app.handle_key(key),
            Some(Event::Reminder(reminder)) => app.push_reminder(reminder),
            Some(Event::Tick) | Some(Event::Resize) => {}
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn start_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Leave raw mode and the alternate screen before a panic message is printed.
fn install_panic_hook() {
    restore_before_panic_message(|| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    });
}

fn restore_before_panic_message<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore();
        default_hook(info);
    }));
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn panic_hook_restores_before_reporting() {
        static RESTORED: AtomicBool = AtomicBool::new(false);

        restore_before_panic_message(|| RESTORED.store(true, Ordering::SeqCst));
        let result = panic::catch_unwind(|| panic!("render failed"));
        let _ = panic::take_hook();

        assert!(result.is_err());
        assert!(RESTORED.load(Ordering::SeqCst));
    }
}
