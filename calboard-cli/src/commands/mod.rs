pub mod config;
pub mod delete;
pub mod events;
pub mod export;
pub mod grid;
pub mod new;
pub mod project;

use std::collections::BTreeSet;

use anyhow::Result;
use calboard_core::date_range::DateRange;
use calboard_core::{CalendarStore, EventStatus, EventType, FilterUpdate};
use clap::Args;

/// Filters shared by the commands that read the visible set.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only events of this type (repeatable)
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Only events with this status (repeatable)
    #[arg(long = "status", value_name = "STATUS")]
    pub statuses: Vec<String>,

    /// Only events tied to this project (repeatable)
    #[arg(long = "project", value_name = "ID")]
    pub projects: Vec<String>,

    /// Only events in this city (repeatable)
    #[arg(long = "city", value_name = "CITY")]
    pub cities: Vec<String>,

    /// Case-insensitive text search over title, description, client, location and tags
    #[arg(long)]
    pub search: Option<String>,

    /// Events starting on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Events starting on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.statuses.is_empty()
            && self.projects.is_empty()
            && self.cities.is_empty()
            && self.search.is_none()
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Only the flags that were given become part of the update.
    pub fn to_update(&self, store: &CalendarStore) -> Result<FilterUpdate> {
        let date_range = if self.from.is_some() || self.to.is_some() {
            Some(DateRange::from_args(self.from.as_deref(), self.to.as_deref(), store.locale())?)
        } else {
            None
        };

        Ok(FilterUpdate {
            event_types: non_empty(self.types.iter().map(|t| EventType::from(t.to_lowercase())).collect()),
            statuses: non_empty(self.statuses.iter().map(|s| EventStatus::from(s.to_lowercase())).collect()),
            project_ids: non_empty(self.projects.iter().cloned().collect()),
            date_range,
            cities: non_empty(self.cities.iter().cloned().collect()),
            search_term: self.search.clone(),
            role_context: None,
        })
    }

    /// Apply the given flags to the store's filters.
    pub fn apply(&self, store: &mut CalendarStore) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let update = self.to_update(store)?;
        store.update_filters(update);
        Ok(())
    }
}

fn non_empty<T: Ord>(set: BTreeSet<T>) -> Option<BTreeSet<T>> {
    if set.is_empty() { None } else { Some(set) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calboard_core::{FixedClock, Locale};
    use chrono::{TimeZone, Utc};

    fn empty_store() -> CalendarStore {
        CalendarStore::new(Locale::default(), FixedClock(Utc.with_ymd_and_hms(2025, 9, 16, 0, 0, 0).unwrap()))
    }

    #[test]
    fn only_given_flags_are_set() {
        let args = FilterArgs {
            types: vec!["job".to_string(), "visit".to_string()],
            cities: vec!["Riyadh".to_string()],
            ..Default::default()
        };

        let update = args.to_update(&empty_store()).unwrap();
        assert_eq!(update.event_types, Some(BTreeSet::from([EventType::Job, EventType::Visit])));
        assert_eq!(update.cities, Some(BTreeSet::from(["Riyadh".to_string()])));
        assert_eq!(update.statuses, None);
        assert_eq!(update.date_range, None);
        assert_eq!(update.search_term, None);
    }

    #[test]
    fn date_flags_become_day_bounds() {
        let args = FilterArgs {
            from: Some("2025-09-01".to_string()),
            ..Default::default()
        };

        let range = args.to_update(&empty_store()).unwrap().date_range.unwrap();
        assert_eq!(range.start, Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()));
        assert_eq!(range.end, None);
    }

    #[test]
    fn bad_dates_are_errors() {
        let args = FilterArgs {
            to: Some("next week".to_string()),
            ..Default::default()
        };
        assert!(args.to_update(&empty_store()).is_err());
    }
}
