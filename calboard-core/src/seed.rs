//! Seed data and event files.
//!
//! Without an event file the store starts from a built-in engineer
//! calendar laid out around an anchor date.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::error::{CalBoardError, CalBoardResult};
use crate::event::{Assignee, EventStatus, EventType, NewEvent, Priority};
use crate::locale::Locale;
use crate::repository::EventRecord;

/// Read a JSON array of event records.
pub fn load_events(path: &Path) -> CalBoardResult<Vec<EventRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_events(&content).map_err(|e| match e {
        CalBoardError::Serialization(msg) => {
            CalBoardError::Serialization(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

pub fn parse_events(content: &str) -> CalBoardResult<Vec<EventRecord>> {
    serde_json::from_str(content).map_err(|e| CalBoardError::Serialization(e.to_string()))
}

/// Write event records as pretty JSON.
pub fn save_events(path: &Path, records: &[EventRecord]) -> CalBoardResult<()> {
    let content =
        serde_json::to_string_pretty(records).map_err(|e| CalBoardError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    // Write a sibling temp file, then rename it over the target
    let temp = path.with_extension("json.tmp");
    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, path)?;
    Ok(())
}

struct SeedTemplate {
    title: &'static str,
    description: &'static str,
    day_offset: i64,
    start: (u32, u32),
    hours: i64,
    event_type: EventType,
    status: EventStatus,
    location: &'static str,
    client: &'static str,
    amount: f64,
    priority: Priority,
    project_id: Option<&'static str>,
    is_recurring: bool,
    tags: &'static [&'static str],
}

fn assignee(id: &str, name: &str) -> Assignee {
    let initials = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase();
    Assignee {
        id: id.to_string(),
        name: name.to_string(),
        initials,
    }
}

/// A small engineer calendar spread over the two weeks after `anchor`.
pub fn engineer_events(anchor: NaiveDate, locale: &Locale) -> Vec<NewEvent> {
    let templates = [
        SeedTemplate {
            title: "HVAC Installation - Tower B",
            description: "Install rooftop units and run commissioning checks",
            day_offset: 0,
            start: (8, 0),
            hours: 6,
            event_type: EventType::Job,
            status: EventStatus::InProgress,
            location: "Riyadh",
            client: "Al Noor Holdings",
            amount: 45000.0,
            priority: Priority::High,
            project_id: Some("PRJ-001"),
            is_recurring: false,
            tags: &["hvac", "installation"],
        },
        SeedTemplate {
            title: "Client Call - Scope Review",
            description: "Walk through the revised electrical scope",
            day_offset: 1,
            start: (10, 30),
            hours: 1,
            event_type: EventType::Call,
            status: EventStatus::Scheduled,
            location: "Riyadh",
            client: "Saudi Build Co",
            amount: 0.0,
            priority: Priority::Medium,
            project_id: Some("PRJ-002"),
            is_recurring: true,
            tags: &["weekly"],
        },
        SeedTemplate {
            title: "Site Visit - Warehouse Survey",
            description: "Measure loading bays for fire suppression quote",
            day_offset: 3,
            start: (9, 0),
            hours: 3,
            event_type: EventType::Visit,
            status: EventStatus::Scheduled,
            location: "Jeddah",
            client: "Red Sea Logistics",
            amount: 0.0,
            priority: Priority::Medium,
            project_id: None,
            is_recurring: false,
            tags: &["survey", "fire-safety"],
        },
        SeedTemplate {
            title: "Phase 1 Milestone Sign-off",
            description: "Handover of ground floor electrical works",
            day_offset: 5,
            start: (13, 0),
            hours: 2,
            event_type: EventType::Milestone,
            status: EventStatus::Open,
            location: "Riyadh",
            client: "Al Noor Holdings",
            amount: 120000.0,
            priority: Priority::High,
            project_id: Some("PRJ-001"),
            is_recurring: false,
            tags: &["handover"],
        },
        SeedTemplate {
            title: "Invoice INV-2041 Due",
            description: "Progress billing for September",
            day_offset: 7,
            start: (9, 0),
            hours: 1,
            event_type: EventType::Invoice,
            status: EventStatus::Quoted,
            location: "Dammam",
            client: "Gulf Energy Services",
            amount: 18750.0,
            priority: Priority::Medium,
            project_id: Some("PRJ-003"),
            is_recurring: false,
            tags: &["billing"],
        },
        SeedTemplate {
            title: "Payout - Completed Jobs",
            description: "Monthly payout for closed work orders",
            day_offset: 10,
            start: (11, 0),
            hours: 1,
            event_type: EventType::Payout,
            status: EventStatus::Completed,
            location: "Riyadh",
            client: "Calboard",
            amount: 32400.0,
            priority: Priority::Low,
            project_id: None,
            is_recurring: true,
            tags: &["finance"],
        },
        SeedTemplate {
            title: "Generator Maintenance",
            description: "Cancelled by client, to be rescheduled",
            day_offset: 12,
            start: (7, 30),
            hours: 4,
            event_type: EventType::Job,
            status: EventStatus::Cancelled,
            location: "Dammam",
            client: "Gulf Energy Services",
            amount: 9800.0,
            priority: Priority::Low,
            project_id: Some("PRJ-003"),
            is_recurring: false,
            tags: &["maintenance"],
        },
    ];

    let crew = [assignee("u-1", "Omar Haddad"), assignee("u-2", "Lina Saleh")];

    templates
        .into_iter()
        .enumerate()
        .map(|(i, template)| {
            let date = anchor + Duration::days(template.day_offset);
            let time = NaiveTime::from_hms_opt(template.start.0, template.start.1, 0).unwrap_or(NaiveTime::MIN);
            let start_time = locale.localize(date.and_time(time));

            NewEvent {
                title: template.title.to_string(),
                description: template.description.to_string(),
                start_time,
                end_time: start_time + Duration::hours(template.hours),
                all_day: false,
                event_type: template.event_type,
                status: template.status,
                location: template.location.to_string(),
                client: template.client.to_string(),
                assignees: vec![crew[i % crew.len()].clone()],
                amount: template.amount,
                priority: template.priority,
                project_id: template.project_id.map(str::to_string),
                is_recurring: template.is_recurring,
                tags: template.tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TypeFamily;

    #[test]
    fn test_seed_is_engineer_calendar() {
        let anchor = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();
        let events = engineer_events(anchor, &Locale::default());

        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.event_type.family() == TypeFamily::Engineer));
        assert!(events.iter().all(|e| e.validate().is_ok()));
        assert_eq!(events[0].assignees[0].initials, "OH");
    }

    #[test]
    fn test_parse_events_accepts_records_with_and_without_ids() {
        let json = r#"[
            {"id": "e-1", "title": "Job", "startTime": "2025-09-16T08:00:00Z",
             "endTime": "2025-09-16T09:00:00Z", "type": "job", "status": "open"},
            {"title": "Call", "startTime": "2025-09-19T10:00:00Z",
             "endTime": "2025-09-19T10:30:00Z", "type": "call", "status": "scheduled",
             "projectId": "P2", "tags": ["follow-up"]}
        ]"#;

        let records = parse_events(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("e-1"));
        assert_eq!(records[1].id, None);
        assert_eq!(records[1].event.project_id.as_deref(), Some("P2"));
        assert_eq!(records[1].event.priority, Priority::Medium);
    }

    #[test]
    fn test_mixed_event_file_fails_to_load() {
        let json = r#"[
            {"title": "Job", "startTime": "2025-09-16T08:00:00Z",
             "endTime": "2025-09-16T09:00:00Z", "type": "job", "status": "open"},
            {"title": "Standup", "startTime": "2025-09-16T09:00:00Z",
             "endTime": "2025-09-16T09:15:00Z", "type": "team-meeting", "status": "scheduled"}
        ]"#;

        let records = parse_events(json).unwrap();
        assert!(matches!(
            crate::repository::EventRepository::load(records),
            Err(CalBoardError::MixedEventTypes)
        ));
    }

    #[test]
    fn test_save_and_load_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/events.json");
        let anchor = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();
        let records: Vec<EventRecord> = engineer_events(anchor, &Locale::default())
            .into_iter()
            .map(|event| EventRecord { id: None, event })
            .collect();

        save_events(&path, &records).unwrap();
        let loaded = load_events(&path).unwrap();

        assert_eq!(loaded.len(), records.len());
        assert_eq!(loaded[0].event, records[0].event);
    }
}
