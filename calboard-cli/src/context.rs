//! Loading the config and event collection for a command.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use calboard_core::{CalBoardConfig, CalendarStore, EventRecord, Locale, SystemClock, seed};

pub struct Context {
    pub config: CalBoardConfig,
    pub store: CalendarStore,
    events_path: Option<PathBuf>,
}

impl Context {
    /// Load config, locale and events. Without an events file the demo
    /// engineer calendar is used.
    pub fn load() -> Result<Self> {
        let config = CalBoardConfig::load().context("Failed to load calboard config")?;

        let system_tz = iana_time_zone::get_timezone().ok();
        let locale = config.locale(system_tz.as_deref())?;
        let events_path = config.events_path();

        let records = match &events_path {
            Some(path) if path.exists() => seed::load_events(path)
                .with_context(|| format!("Failed to read events from {}", path.display()))?,
            Some(path) => {
                tracing::info!(path = %path.display(), "events file missing, starting empty");
                Vec::new()
            }
            None => demo_records(&locale),
        };

        let store = CalendarStore::load(locale, SystemClock, records)
            .context("Failed to load events")?
            .with_view(config.default_view, config.agenda_days);

        Ok(Context {
            config,
            store,
            events_path,
        })
    }

    /// Changes to the demo calendar cannot be kept, so commands that
    /// modify events need an events file.
    pub fn require_events_file(&self) -> Result<()> {
        if self.events_path.is_none() {
            let config_path = CalBoardConfig::config_path()?;
            anyhow::bail!(
                "No events file configured.\n\n\
                Set one in {}:\n  \
                events_file = \"~/calboard/events.json\"",
                config_path.display()
            );
        }
        Ok(())
    }

    /// Write the store's events back to the events file.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.events_path else {
            return Ok(());
        };

        seed::save_events(path, &self.store.to_records())
            .with_context(|| format!("Failed to write events to {}", path.display()))
    }
}

fn demo_records(locale: &Locale) -> Vec<EventRecord> {
    let today = locale.local_date(chrono::Utc::now());
    seed::engineer_events(today, locale)
        .into_iter()
        .map(|event| EventRecord { id: None, event })
        .collect()
}
