//! The CSV-backed event store.
//!
//! The store is owned by exactly one component (the UI or a CLI command) and
//! is only ever appended to. Readers elsewhere, such as the reminder poller,
//! get snapshots through [`EventStore::subscribe`].

pub mod table;

use std::path::{Path, PathBuf};

use log::debug;
use tokio::sync::watch;

use crate::error::{AgendaError, AgendaResult};
use crate::event::Event;

pub struct EventStore {
    path: PathBuf,
    events: Vec<Event>,
    snapshot: watch::Sender<Vec<Event>>,
}

impl EventStore {
    /// Load the store from `path`. A missing file gives an empty store.
    pub fn load(path: impl Into<PathBuf>) -> AgendaResult<Self> {
        let path = path.into();
        let events = table::read(&path)?;
        debug!("Loaded {} events from {}", events.len(), path.display());

        let (snapshot, _) = watch::channel(events.clone());

        Ok(EventStore {
            path,
            events,
            snapshot,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Events in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Validate user input and append it as a new event.
    ///
    /// Nothing changes on a validation error. If the table cannot be written
    /// the event is removed again, so memory and disk stay in step.
    pub fn append(
        &mut self,
        title: &str,
        date: &str,
        time: &str,
        reminder: bool,
    ) -> AgendaResult<Event> {
        let event = Event::new(title, date, time, reminder)?;

        self.events.push(event.clone());
        if let Err(e) = self.persist() {
            self.events.pop();
            return Err(e);
        }

        self.snapshot.send_replace(self.events.clone());
        Ok(event)
    }

    /// All events ordered by `(date, time)`.
    ///
    /// Plain string comparison is chronological because both fields are
    /// fixed-width and zero-padded. The sort is stable, so events sharing a
    /// timestamp keep their insertion order.
    pub fn sorted_view(&self) -> Vec<Event> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
        events
    }

    /// Overwrite the file with the full table.
    pub fn persist(&self) -> AgendaResult<()> {
        table::write(&self.path, &self.events).map_err(|source| AgendaError::Persist {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} events to {}", self.events.len(), self.path.display());
        Ok(())
    }

    /// Receive a copy of the table now and after every successful append.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Event>> {
        self.snapshot.subscribe()
    }
}
