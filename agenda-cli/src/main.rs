mod commands;
mod render;
mod singleton;
mod tui;

use std::fs::OpenOptions;
use std::path::PathBuf;

use agenda_core::config::AgendaConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Record calendar events and get reminded when they start")]
struct Cli {
    /// Events file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an event
    Add {
        title: String,

        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Event time (HH:MM, 24-hour)
        #[arg(short, long)]
        time: String,

        /// Raise a reminder when the event starts
        #[arg(short, long)]
        reminder: bool,
    },
    /// List events in chronological order
    List,
    /// Print reminders as they come due
    Watch {
        /// Also fire reminders whose minute was missed between checks
        #[arg(long)]
        catch_up: bool,
    },
    /// Open the interactive event form (default)
    Tui,
    /// Show configuration paths and settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AgendaConfig::load()?;
    let events_path = cli.file.unwrap_or_else(|| config.events_path());

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Add {
            title,
            date,
            time,
            reminder,
        } => {
            init_logging(&config, false)?;
            commands::add::run(&events_path, &title, &date, &time, reminder)
        }
        Commands::List => {
            init_logging(&config, false)?;
            commands::list::run(&events_path)
        }
        Commands::Watch { catch_up } => {
            init_logging(&config, false)?;
            let mode = if catch_up {
                agenda_core::reminder::ReminderMode::CatchUp
            } else {
                config.reminder_mode
            };
            commands::watch::run(events_path, config.poll_interval(), mode).await
        }
        Commands::Tui => {
            init_logging(&config, true)?;
            tui::run(events_path, &config).await
        }
        Commands::Config => commands::config::run(&config, &events_path),
    }
}

/// Set up `env_logger`. The terminal UI owns the screen, so its log output
/// goes to a file in the data directory instead of stderr.
fn init_logging(config: &AgendaConfig, to_file: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.log_level),
    );

    if to_file {
        let dir = agenda_core::config::data_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let log_path = dir.join("agenda.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open {}", log_path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
