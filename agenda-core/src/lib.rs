//! Core types for agenda.
//!
//! This crate provides everything the binaries share:
//! - `Event` and its input validation
//! - `EventStore`, the CSV-backed table of events
//! - `reminder`, the periodic check that turns due events into notifications
//! - `config` for the user's `config.toml`

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod reminder;
pub mod store;

pub use error::{AgendaError, AgendaResult};
pub use event::{Event, Field, ValidationError};
pub use store::EventStore;
