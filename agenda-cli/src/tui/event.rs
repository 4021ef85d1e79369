//! Keyboard, tick and reminder events for the UI loop.

use agenda_core::reminder::Reminder;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Everything the UI loop reacts to
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resize
    Resize,
    /// Redraw timer
    Tick,
    /// A reminder from the poller
    Reminder(Reminder),
}

/// Merges terminal input and poller reminders into one stream, so reminders
/// are handled on the UI task and never from the poller itself.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, mut reminders: mpsc::UnboundedReceiver<Reminder>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // crossterm reads block, so they get their own thread
        let key_tx = tx.clone();
        std::thread::spawn(move || {
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
                        _ => continue,
                    }
                } else {
                    Event::Tick
                };

                if key_tx.send(event).is_err() {
                    break;
                }
            }
        });

        tokio::spawn(async move {
            while let Some(reminder) = reminders.recv().await {
                if tx.send(Event::Reminder(reminder)).is_err() {
                    break;
                }
            }
        });

        EventHandler { rx }
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
