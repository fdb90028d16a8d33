//! End-to-end scenarios against the public store API.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use calboard_core::date_range::DateRange;
use calboard_core::seed;
use calboard_core::{
    CalBoardError, CalendarStore, EventPatch, EventType, FilterUpdate, FixedClock, Locale, NewEvent, StoreChange,
    ViewMode,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 9, 16, 6, 0, 0).unwrap())
}

fn make_test_event(title: &str, start: DateTime<Utc>, event_type: EventType, project: &str) -> NewEvent {
    let mut event = NewEvent::draft_at(title, start.date_naive(), None, &Locale::default());
    event.start_time = start;
    event.end_time = start + Duration::hours(1);
    event.all_day = false;
    event.event_type = event_type;
    event.project_id = Some(project.to_string());
    event
}

fn e1_e2_store() -> CalendarStore {
    let e1 = make_test_event("E1", Utc.with_ymd_and_hms(2025, 9, 16, 8, 0, 0).unwrap(), EventType::Job, "P1");
    let e2 = make_test_event("E2", Utc.with_ymd_and_hms(2025, 9, 19, 10, 0, 0).unwrap(), EventType::Call, "P2");
    CalendarStore::with_events(Locale::default(), fixed_clock(), [e1, e2]).unwrap()
}

fn visible_titles(store: &CalendarStore) -> Vec<String> {
    store.visible_events().iter().map(|e| e.title.clone()).collect()
}

#[test]
fn test_project_filter_scenario() {
    let mut store = e1_e2_store();

    store.update_filters(FilterUpdate {
        project_ids: Some(BTreeSet::from(["P1".to_string()])),
        ..Default::default()
    });
    assert_eq!(visible_titles(&store), vec!["E1"]);

    let p2: Vec<&str> = store.events_for_project("P2").iter().map(|e| e.title.as_str()).collect();
    assert_eq!(p2, vec!["E2"], "Project query should ignore the active filter");

    store.clear_filters();
    assert_eq!(visible_titles(&store), vec!["E1", "E2"]);
}

#[test]
fn test_export_collapses_title_newlines() {
    let mut event = make_test_event(
        "Site Visit\nPhase 1",
        Utc.with_ymd_and_hms(2025, 9, 16, 8, 0, 0).unwrap(),
        EventType::Visit,
        "P1",
    );
    event.location = "Riyadh\nBlock C".to_string();
    let store = CalendarStore::with_events(Locale::default(), fixed_clock(), [event]).unwrap();

    let ics = store.export_ics().unwrap();
    let summary = ics
        .split("\r\n")
        .find(|l| l.starts_with("SUMMARY:"))
        .expect("Should have SUMMARY line");

    assert_eq!(summary, "SUMMARY:Site Visit Phase 1");
    assert!(ics.contains("LOCATION:Riyadh Block C"), "ICS:\n{}", ics);
    assert!(ics.contains("DTSTART:20250916T080000Z"), "ICS:\n{}", ics);
    assert!(ics.contains("DTEND:20250916T090000Z"), "ICS:\n{}", ics);
}

#[test]
fn test_date_range_checks_start_time_only() {
    let mut store = e1_e2_store();
    // E1 runs 08:00-09:00; a range starting at 08:30 excludes it
    let range = DateRange::new(
        Utc.with_ymd_and_hms(2025, 9, 16, 8, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap(),
    );
    store.update_filters(FilterUpdate {
        date_range: Some(range),
        ..Default::default()
    });

    assert_eq!(visible_titles(&store), vec!["E2"]);
}

#[test]
fn test_inverted_date_range_hides_everything() {
    let mut store = e1_e2_store();
    let range = DateRange::new(
        Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(),
    );
    store.update_filters(FilterUpdate {
        date_range: Some(range),
        ..Default::default()
    });

    assert!(store.visible_events().is_empty());
    assert_eq!(store.events().len(), 2);
}

#[test]
fn test_update_resorts_and_rejects_bad_times() {
    let mut store = e1_e2_store();
    let e2_id = store.events()[1].id.clone();

    let earlier = Utc.with_ymd_and_hms(2025, 9, 10, 9, 0, 0).unwrap();
    assert!(
        store
            .update_event(&e2_id, EventPatch {
                start_time: Some(earlier),
                end_time: Some(earlier + Duration::hours(2)),
                ..Default::default()
            })
            .unwrap()
    );
    assert_eq!(store.events()[0].id, e2_id);

    let result = store.update_event(&e2_id, EventPatch {
        end_time: Some(earlier - Duration::hours(1)),
        ..Default::default()
    });
    assert!(matches!(result, Err(CalBoardError::InvalidTimeRange { .. })));
    assert_eq!(store.get_event(&e2_id).unwrap().end_time, earlier + Duration::hours(2));
}

#[test]
fn test_rapid_adds_get_distinct_ids() {
    let mut store = CalendarStore::new(Locale::default(), fixed_clock());
    let start = Utc.with_ymd_and_hms(2025, 9, 16, 8, 0, 0).unwrap();

    let ids: BTreeSet<String> = (0..200)
        .map(|i| {
            store
                .add_event(make_test_event(&format!("Job {i}"), start, EventType::Job, "P1"))
                .unwrap()
                .id
        })
        .collect();

    assert_eq!(ids.len(), 200);
}

#[test]
fn test_subscriber_sees_fresh_visible_set() {
    let mut store = e1_e2_store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    store.update_filters(FilterUpdate {
        search_term: Some("e2".to_string()),
        ..Default::default()
    });
    store.set_view(ViewMode::Agenda);
    store.next_period();

    assert_eq!(
        *seen.borrow(),
        vec![StoreChange::FiltersChanged, StoreChange::ViewChanged, StoreChange::ViewChanged]
    );
    assert_eq!(store.current_date(), NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
}

#[test]
fn test_seed_calendar_loads_into_store() {
    let locale = Locale::new(chrono_tz::Asia::Riyadh);
    let anchor = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();
    let events = seed::engineer_events(anchor, &locale);
    let count = events.len();

    let store = CalendarStore::with_events(locale, fixed_clock(), events).unwrap();

    assert_eq!(store.events().len(), count);
    assert!(store.events().windows(2).all(|w| w[0].start_time <= w[1].start_time));
    assert_eq!(store.events_for_project("PRJ-001").len(), 2);
}

#[test]
fn test_event_file_round_trip_keeps_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    let store = e1_e2_store();

    seed::save_events(&path, &store.to_records()).unwrap();
    let reloaded = CalendarStore::load(Locale::default(), fixed_clock(), seed::load_events(&path).unwrap()).unwrap();

    let ids = |s: &CalendarStore| s.events().iter().map(|e| e.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&reloaded), ids(&store));
}
