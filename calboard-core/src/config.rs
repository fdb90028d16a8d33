//! Calboard configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use ::config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalBoardError, CalBoardResult};
use crate::locale::Locale;
use crate::lookup::CurrencyFormat;
use crate::view::ViewMode;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "CALBOARD_CONFIG";

static DEFAULT_EXPORT_DIR: &str = ".";
static DEFAULT_CALENDAR_NAME: &str = "calboard";
const DEFAULT_AGENDA_DAYS: u32 = 14;

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

fn default_calendar_name() -> String {
    DEFAULT_CALENDAR_NAME.to_string()
}

fn default_agenda_days() -> u32 {
    DEFAULT_AGENDA_DAYS
}

/// Configuration at ~/.config/calboard/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalBoardConfig {
    /// JSON event file; the built-in seed calendar is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,

    /// IANA time zone name; the system zone is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default)]
    pub default_view: ViewMode,

    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    #[serde(default = "default_agenda_days")]
    pub agenda_days: u32,

    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    #[serde(default)]
    pub currency: CurrencyFormat,
}

impl Default for CalBoardConfig {
    fn default() -> Self {
        CalBoardConfig {
            events_file: None,
            timezone: None,
            default_view: ViewMode::default(),
            export_dir: default_export_dir(),
            agenda_days: DEFAULT_AGENDA_DAYS,
            calendar_name: default_calendar_name(),
            currency: CurrencyFormat::default(),
        }
    }
}

impl CalBoardConfig {
    pub fn config_path() -> CalBoardResult<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Ok(expand(Path::new(&path)));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalBoardError::Config("Could not determine config directory".into()))?
            .join("calboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config, creating a commented default file on first use.
    pub fn load() -> CalBoardResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalBoardResult<Self> {
        let config: CalBoardConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| CalBoardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalBoardError::Config(e.to_string()))?;

        if config.agenda_days == 0 {
            return Err(CalBoardError::Config("agenda_days must be at least 1".into()));
        }

        Ok(config)
    }

    /// Save the config to `path`.
    pub fn save(&self, path: &Path) -> CalBoardResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalBoardError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalBoardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalBoardResult<()> {
        let contents = format!(
            "\
# calboard configuration

# JSON file holding your events (the demo calendar is used when unset):
# events_file = \"~/calboard/events.json\"

# Time zone for day boundaries (defaults to the system zone):
# timezone = \"Asia/Riyadh\"

# Initial view: month, week, day or agenda
# default_view = \"month\"

# Days shown per agenda page:
# agenda_days = {}

# Where `calboard export` writes .ics files:
# export_dir = \"{}\"

# Used to name exported files:
# calendar_name = \"{}\"

# Amount formatting:
# [currency]
# symbol = \"SAR\"
# grouping_separator = \",\"
# symbol_after = false
",
            DEFAULT_AGENDA_DAYS, DEFAULT_EXPORT_DIR, DEFAULT_CALENDAR_NAME
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalBoardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalBoardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn events_path(&self) -> Option<PathBuf> {
        self.events_file.as_deref().map(expand)
    }

    pub fn export_path(&self) -> PathBuf {
        expand(&self.export_dir)
    }

    /// Build the locale, falling back to `system_timezone` and then UTC
    /// when no zone is configured.
    pub fn locale(&self, system_timezone: Option<&str>) -> CalBoardResult<Locale> {
        let timezone = match self.timezone.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => system_timezone
                .and_then(|name| name.parse::<Tz>().ok())
                .unwrap_or(Tz::UTC),
        };

        Ok(Locale {
            timezone,
            currency: self.currency.clone(),
        })
    }
}

fn parse_timezone(name: &str) -> CalBoardResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| CalBoardError::Config(format!("Unknown time zone '{name}'")))
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalBoardConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, CalBoardConfig::default());
    }

    #[test]
    fn test_default_file_is_all_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calboard/config.toml");

        CalBoardConfig::create_default_config(&path).unwrap();
        let config = CalBoardConfig::load_from(&path).unwrap();

        assert_eq!(config, CalBoardConfig::default());
    }

    #[test]
    fn test_load_reads_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
events_file = "/srv/calboard/events.json"
timezone = "Asia/Riyadh"
default_view = "week"
agenda_days = 7

[currency]
symbol = "ر.س"
symbol_after = true
"#,
        )
        .unwrap();

        let config = CalBoardConfig::load_from(&path).unwrap();
        assert_eq!(config.default_view, ViewMode::Week);
        assert_eq!(config.agenda_days, 7);
        assert_eq!(config.events_path(), Some(PathBuf::from("/srv/calboard/events.json")));
        assert_eq!(config.currency.symbol, "ر.س");
        assert_eq!(config.currency.grouping_separator, ",");
        assert!(config.currency.symbol_after);

        let locale = config.locale(None).unwrap();
        assert_eq!(locale.timezone, chrono_tz::Asia::Riyadh);
    }

    #[test]
    fn test_zero_agenda_days_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "agenda_days = 0\n").unwrap();

        assert!(matches!(
            CalBoardConfig::load_from(&path),
            Err(CalBoardError::Config(_))
        ));
    }

    #[test]
    fn test_locale_timezone_fallbacks() {
        let config = CalBoardConfig::default();
        assert_eq!(config.locale(Some("Europe/Berlin")).unwrap().timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.locale(Some("Not/AZone")).unwrap().timezone, Tz::UTC);
        assert_eq!(config.locale(None).unwrap().timezone, Tz::UTC);

        let config = CalBoardConfig {
            timezone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        assert!(config.locale(None).is_err());
    }

    #[test]
    fn test_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = CalBoardConfig {
            timezone: Some("Asia/Riyadh".to_string()),
            agenda_days: 21,
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(CalBoardConfig::load_from(&path).unwrap(), config);
    }
}
