use anyhow::Result;
use calboard_core::CalBoardConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = CalBoardConfig::config_path()?;
    let config = CalBoardConfig::load()?;
    let system_tz = iana_time_zone::get_timezone().ok();
    let locale = config.locale(system_tz.as_deref())?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    match config.events_path() {
        Some(path) => println!("  Events:     {}", path.display()),
        None => println!("  Events:     {}", "(demo calendar)".dimmed()),
    }
    println!("  Exports:    {}", config.export_path().display());

    println!();
    println!("{}", "Settings".bold());
    println!("  Time zone:  {}", locale.timezone.name());
    println!("  View:       {}", config.default_view);
    println!("  Agenda:     {} days", config.agenda_days);
    println!("  Currency:   {}", locale.format_currency(1234567.0));
    println!("  Calendar:   {}", config.calendar_name);

    Ok(())
}
