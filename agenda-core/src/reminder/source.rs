//! Where the poller reads events from on each tick.

use std::path::PathBuf;

use log::warn;
use tokio::sync::watch;

use crate::event::Event;
use crate::store::table;

/// A read-only view of the event table.
pub trait EventSource: Send + 'static {
    fn snapshot(&mut self) -> Vec<Event>;
}

/// Snapshots published by an in-process [`crate::EventStore`].
impl EventSource for watch::Receiver<Vec<Event>> {
    fn snapshot(&mut self) -> Vec<Event> {
        self.borrow_and_update().clone()
    }
}

/// A fixed list of events.
impl EventSource for Vec<Event> {
    fn snapshot(&mut self) -> Vec<Event> {
        self.clone()
    }
}

/// Re-reads the events file on every tick, for processes that do not own the
/// store. If a reload fails the previous table is reused.
pub struct FileSource {
    path: PathBuf,
    last_good: Vec<Event>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource {
            path: path.into(),
            last_good: Vec::new(),
        }
    }
}

impl EventSource for FileSource {
    fn snapshot(&mut self) -> Vec<Event> {
        match table::read(&self.path) {
            Ok(events) => {
                self.last_good = events;
            }
            Err(e) => {
                warn!("Could not reload {}: {}", self.path.display(), e);
            }
        }
        self.last_good.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_source_picks_up_new_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        let mut source = FileSource::new(&path);

        assert!(source.snapshot().is_empty());

        fs::write(&path, "Title,Date,Time,Reminder\nMeeting,2024-03-01,10:00,1\n").unwrap();
        assert_eq!(source.snapshot().len(), 1);
    }

    #[test]
    fn file_source_keeps_last_good_table_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        fs::write(&path, "Title,Date,Time,Reminder\nMeeting,2024-03-01,10:00,1\n").unwrap();
        let mut source = FileSource::new(&path);
        assert_eq!(source.snapshot().len(), 1);

        fs::write(&path, "Title,Date,Time,Reminder\nMeeting,2024-03-01\n").unwrap();
        let events = source.snapshot();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Meeting");
    }
}
