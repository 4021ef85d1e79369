//! Reading and writing the events table as CSV.
//!
//! The file has a fixed `Title,Date,Time,Reminder` header and one row per
//! event. The reminder flag is written as `0`/`1`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::CSV_HEADER;
use crate::error::{AgendaError, AgendaResult};
use crate::event::Event;

#[derive(Serialize, Deserialize)]
struct Row {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Reminder", with = "flag")]
    reminder: bool,
}

impl From<Row> for Event {
    fn from(row: Row) -> Self {
        Event {
            title: row.title,
            date: row.date,
            time: row.time,
            reminder: row.reminder,
        }
    }
}

impl From<&Event> for Row {
    fn from(event: &Event) -> Self {
        Row {
            title: event.title.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            reminder: event.reminder,
        }
    }
}

/// Read every event from the file at `path`.
///
/// A missing file reads as an empty table. Cell contents are not validated
/// beyond the reminder flag; structural problems are reported as
/// [`AgendaError::CorruptStore`].
pub fn read(path: &Path) -> AgendaResult<Vec<Event>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AgendaError::Io(e)),
    };

    let mut reader = csv::Reader::from_reader(file);

    // an empty file has no header either and reads as an empty table
    let headers = reader.headers().map_err(|e| read_error(path, e))?;
    if !headers.is_empty() && !headers.iter().eq(CSV_HEADER) {
        return Err(AgendaError::CorruptStore {
            path: path.to_path_buf(),
            line: 1,
            reason: format!("expected header {}", CSV_HEADER.join(",")),
        });
    }

    let mut events = Vec::new();

    for row in reader.deserialize::<Row>() {
        let row = row.map_err(|e| read_error(path, e))?;
        events.push(Event::from(row));
    }

    Ok(events)
}

/// Replace the file at `path` with the given events.
///
/// The table is written to a temporary file in the same directory and then
/// renamed over `path`, so readers see either the old or the new table.
pub fn write(path: &Path, events: &[Event]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write_to(&mut tmp, events)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Serialize the table (header included, even when empty) into `writer`.
pub fn write_to<W: Write>(writer: W, events: &[Event]) -> io::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for event in events {
        csv_writer.serialize(Row::from(event))?;
    }
    csv_writer.flush()?;

    Ok(())
}

fn read_error(path: &Path, err: csv::Error) -> AgendaError {
    let line = err.position().map_or(0, |pos| pos.line());
    let reason = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    };

    match err.into_kind() {
        csv::ErrorKind::Io(e) => AgendaError::Io(e),
        _ => AgendaError::CorruptStore {
            path: path.to_path_buf(),
            line,
            reason,
        },
    }
}

mod flag {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    /// Accepts `0`/`1` and, for hand-edited files, `true`/`false` in any case.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(D::Error::custom(format!(
                "invalid reminder flag '{}', expected 0 or 1",
                other
            ))),
        }
    }
}
