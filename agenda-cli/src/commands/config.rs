use std::path::Path;

use agenda_core::config::AgendaConfig;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(config: &AgendaConfig, events_path: &Path) -> Result<()> {
    let config_path = AgendaConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:    {}", config_path.display());
    println!("  Events:    {}", events_path.display());
    println!("  Log:       {}", agenda_core::config::data_dir().join("agenda.log").display());
    println!();
    println!("{}", "Reminders".bold());
    println!("  Interval:  {}s", config.poll_interval().as_secs());
    println!("  Mode:      {}", config.reminder_mode);

    Ok(())
}
