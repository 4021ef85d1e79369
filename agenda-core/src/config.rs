//! User configuration at ~/.config/agenda/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::DEFAULT_POLL_INTERVAL_SECS;
use crate::error::{AgendaError, AgendaResult};
use crate::reminder::ReminderMode;

fn default_events_file() -> PathBuf {
    data_dir().join("events.csv")
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Settings shared by the CLI and the notifier.
///
/// Every key is optional. Values from `AGENDA_*` environment variables
/// (e.g. `AGENDA_EVENTS_FILE`) take precedence over the file.
#[derive(Debug, Clone, Deserialize)]
pub struct AgendaConfig {
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub reminder_mode: ReminderMode,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            events_file: default_events_file(),
            poll_interval_secs: default_poll_interval_secs(),
            reminder_mode: ReminderMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented-out default file first if
    /// none exists yet.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        Self::load_layered(path, Environment::with_prefix("AGENDA"))
    }

    fn load_layered(path: &Path, env: Environment) -> AgendaResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(env.try_parsing(true))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// The events file with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        expand_tilde(&self.events_file)
    }

    /// Time between reminder checks, never below one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Where events are stored:
# events_file = \"{}\"

# Seconds between reminder checks:
# poll_interval_secs = {}

# \"exact\" fires a reminder only if a check lands on its minute.
# \"catch_up\" also fires reminders whose minute passed between two checks.
# reminder_mode = \"exact\"

# Default log filter (overridden by RUST_LOG):
# log_level = \"warn\"
",
            default_events_file().display(),
            DEFAULT_POLL_INTERVAL_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Directory for agenda's data files (events table, logs).
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("agenda"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
