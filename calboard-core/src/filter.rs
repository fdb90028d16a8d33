//! Filter engine: reduces the canonical collection to the visible subset.
//!
//! Predicates are AND-combined and evaluated in a fixed order, stopping at
//! the first one that rejects the event:
//! search, type, status, project, date range, city.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::event::{CalendarEvent, EventStatus, EventType};

/// Scope hint for whose events a view is about. Stored with the filters but
/// not consulted when computing the visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleContext {
    Mine,
    Team,
    Company,
}

/// Query applied to the event collection. Empty sets mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarFilters {
    pub event_types: BTreeSet<EventType>,
    pub statuses: BTreeSet<EventStatus>,
    pub project_ids: BTreeSet<String>,
    pub date_range: DateRange,
    pub cities: BTreeSet<String>,
    pub search_term: String,
    pub role_context: Option<RoleContext>,
}

/// Fields to replace in the current filters. Each present field replaces
/// the old value wholesale, including `date_range`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub event_types: Option<BTreeSet<EventType>>,
    pub statuses: Option<BTreeSet<EventStatus>>,
    pub project_ids: Option<BTreeSet<String>>,
    pub date_range: Option<DateRange>,
    pub cities: Option<BTreeSet<String>>,
    pub search_term: Option<String>,
    pub role_context: Option<Option<RoleContext>>,
}

/// The predicate that rejected an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    Search,
    Type,
    Status,
    Project,
    DateRange,
    City,
}

impl CalendarFilters {
    pub fn is_empty(&self) -> bool {
        self.event_types.is_empty()
            && self.statuses.is_empty()
            && self.project_ids.is_empty()
            && self.date_range.is_unbounded()
            && self.cities.is_empty()
            && self.search_term.is_empty()
    }

    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(event_types) = update.event_types {
            self.event_types = event_types;
        }
        if let Some(statuses) = update.statuses {
            self.statuses = statuses;
        }
        if let Some(project_ids) = update.project_ids {
            self.project_ids = project_ids;
        }
        if let Some(date_range) = update.date_range {
            self.date_range = date_range;
        }
        if let Some(cities) = update.cities {
            self.cities = cities;
        }
        if let Some(search_term) = update.search_term {
            self.search_term = search_term;
        }
        if let Some(role_context) = update.role_context {
            self.role_context = role_context;
        }
    }

    pub fn matches(&self, event: &CalendarEvent) -> bool {
        first_rejection(event, self).is_none()
    }
}

/// The first predicate that rejects `event`, or None if it is visible.
pub fn first_rejection(event: &CalendarEvent, filters: &CalendarFilters) -> Option<FilterStage> {
    rejection(event, filters, &filters.search_term.to_lowercase())
}

fn rejection(event: &CalendarEvent, filters: &CalendarFilters, needle: &str) -> Option<FilterStage> {
    if !event.matches_search(needle) {
        return Some(FilterStage::Search);
    }

    if !filters.event_types.is_empty() && !filters.event_types.contains(&event.event_type) {
        return Some(FilterStage::Type);
    }

    if !filters.statuses.is_empty() && !filters.statuses.contains(&event.status) {
        return Some(FilterStage::Status);
    }

    if !filters.project_ids.is_empty() {
        match &event.project_id {
            Some(project_id) if filters.project_ids.contains(project_id) => {}
            _ => return Some(FilterStage::Project),
        }
    }

    // Only the start time is checked: an event that begins before the range
    // and ends inside it is excluded.
    if !filters.date_range.contains(event.start_time) {
        return Some(FilterStage::DateRange);
    }

    if !filters.cities.is_empty() && !filters.cities.contains(&event.location) {
        return Some(FilterStage::City);
    }

    None
}

/// Compute the visible subset of `events`, preserving their order.
pub fn compute_visible(events: &[CalendarEvent], filters: &CalendarFilters) -> Vec<CalendarEvent> {
    let needle = filters.search_term.to_lowercase();

    events
        .iter()
        .filter(|event| match rejection(event, filters, &needle) {
            Some(stage) => {
                tracing::trace!(event_id = %event.id, ?stage, "event filtered out");
                false
            }
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Priority;
    use chrono::{Duration, TimeZone, Utc};

    fn make_event(id: &str, event_type: EventType, day: u32, project: Option<&str>) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2025, 9, day, 9, 0, 0).unwrap();
        CalendarEvent {
            id: id.to_string(),
            title: format!("Event {id}"),
            description: String::new(),
            start_time: start,
            end_time: start + Duration::hours(1),
            all_day: false,
            event_type,
            status: EventStatus::Scheduled,
            location: "Riyadh".to_string(),
            client: "Client".to_string(),
            assignees: vec![],
            amount: 0.0,
            priority: Priority::Medium,
            project_id: project.map(str::to_string),
            is_recurring: false,
            tags: BTreeSet::new(),
        }
    }

    fn ids(events: &[CalendarEvent]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        let events = vec![
            make_event("a", EventType::Job, 1, None),
            make_event("b", EventType::Call, 2, Some("P1")),
        ];
        let filters = CalendarFilters::default();

        assert!(filters.is_empty());
        assert_eq!(compute_visible(&events, &filters), events);
    }

    #[test]
    fn test_type_and_status_filters() {
        let mut cancelled = make_event("c", EventType::Job, 3, None);
        cancelled.status = EventStatus::Cancelled;
        let events = vec![
            make_event("a", EventType::Job, 1, None),
            make_event("b", EventType::Call, 2, None),
            cancelled,
        ];

        let filters = CalendarFilters {
            event_types: BTreeSet::from([EventType::Job]),
            statuses: BTreeSet::from([EventStatus::Scheduled]),
            ..Default::default()
        };

        assert_eq!(ids(&compute_visible(&events, &filters)), vec!["a"]);
    }

    #[test]
    fn test_project_filter_drops_unassigned_events() {
        let events = vec![
            make_event("a", EventType::Job, 1, Some("P1")),
            make_event("b", EventType::Job, 2, None),
            make_event("c", EventType::Job, 3, Some("P2")),
        ];
        let filters = CalendarFilters {
            project_ids: BTreeSet::from(["P1".to_string()]),
            ..Default::default()
        };

        assert_eq!(ids(&compute_visible(&events, &filters)), vec!["a"]);
        assert_eq!(first_rejection(&events[1], &filters), Some(FilterStage::Project));
    }

    #[test]
    fn test_date_range_checks_start_time_only() {
        let mut straddling = make_event("a", EventType::Job, 9, None);
        straddling.end_time = straddling.start_time + Duration::days(3);

        let filters = CalendarFilters {
            date_range: DateRange {
                start: Some(Utc.with_ymd_and_hms(2025, 9, 10, 0, 0, 0).unwrap()),
                end: None,
            },
            ..Default::default()
        };

        assert_eq!(first_rejection(&straddling, &filters), Some(FilterStage::DateRange));
    }

    #[test]
    fn test_city_filter_matches_location_exactly() {
        let mut jeddah = make_event("b", EventType::Job, 2, None);
        jeddah.location = "Jeddah".to_string();
        let events = vec![make_event("a", EventType::Job, 1, None), jeddah];

        let filters = CalendarFilters {
            cities: BTreeSet::from(["Jeddah".to_string()]),
            ..Default::default()
        };

        assert_eq!(ids(&compute_visible(&events, &filters)), vec!["b"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let events = vec![make_event("a", EventType::Job, 1, None)];
        let filters = CalendarFilters {
            search_term: "EVENT A".to_string(),
            ..Default::default()
        };
        assert_eq!(compute_visible(&events, &filters).len(), 1);
    }

    #[test]
    fn test_rejection_order_reports_first_failing_stage() {
        let event = make_event("a", EventType::Job, 1, None);
        let filters = CalendarFilters {
            search_term: "nothing like this".to_string(),
            event_types: BTreeSet::from([EventType::Call]),
            cities: BTreeSet::from(["Dammam".to_string()]),
            ..Default::default()
        };
        assert_eq!(first_rejection(&event, &filters), Some(FilterStage::Search));

        let filters = CalendarFilters {
            search_term: String::new(),
            ..filters
        };
        assert_eq!(first_rejection(&event, &filters), Some(FilterStage::Type));
    }

    #[test]
    fn test_role_context_is_not_a_predicate() {
        let event = make_event("a", EventType::Job, 1, None);
        let filters = CalendarFilters {
            role_context: Some(RoleContext::Company),
            ..Default::default()
        };
        assert!(filters.matches(&event));
    }

    #[test]
    fn test_merge_replaces_only_given_fields() {
        let mut filters = CalendarFilters {
            search_term: "pump".to_string(),
            cities: BTreeSet::from(["Riyadh".to_string()]),
            ..Default::default()
        };

        filters.merge(FilterUpdate {
            project_ids: Some(BTreeSet::from(["P1".to_string()])),
            search_term: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(filters.search_term, "");
        assert!(filters.cities.contains("Riyadh"));
        assert!(filters.project_ids.contains("P1"));
    }
}
