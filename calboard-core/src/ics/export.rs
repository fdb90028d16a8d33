//! ICS export of a set of events.

use chrono::{DateTime, NaiveDate, Utc};
use icalendar::{Calendar, Component, EventLike};

use crate::error::CalBoardResult;
use crate::event::{CalendarEvent, EventStatus};

/// Product identifier written as PRODID and used in generated UIDs.
pub const PRODUCT_ID: &str = "calboard";

const PRODID_LINE: &str = "PRODID:-//Calboard//Calendar Export//EN";

/// Render `events` as one VCALENDAR with a VEVENT per event.
///
/// UIDs are built from the event's position, the export time and the
/// product id, so they are unique within one export only.
pub fn export_ics(events: &[CalendarEvent], exported_at: DateTime<Utc>) -> CalBoardResult<String> {
    let mut cal = Calendar::new();
    let dtstamp = format_utc(exported_at);

    for (index, event) in events.iter().enumerate() {
        let mut ics_event = icalendar::Event::new();

        let uid = format!("{}-{}@{}", index, exported_at.timestamp_millis(), PRODUCT_ID);
        ics_event.uid(&uid);
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.add_property("DTSTART", format_utc(event.start_time));
        ics_event.add_property("DTEND", format_utc(event.end_time));
        ics_event.summary(&single_line(&event.title));

        if !event.location.is_empty() {
            ics_event.location(&single_line(&event.location));
        }

        if !event.description.is_empty() {
            ics_event.description(&single_line(&event.description));
        }

        if event.status == EventStatus::Cancelled {
            ics_event.add_property("STATUS", "CANCELLED");
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();
    let output = strip_ics_bloat(&cal.to_string());

    tracing::debug!(events = events.len(), bytes = output.len(), "exported ics");
    Ok(output)
}

/// File name for an export, e.g. `field-schedule-2025-09-16.ics`.
pub fn export_file_name(calendar_name: &str, date: NaiveDate) -> String {
    let base = slug::slugify(calendar_name);
    let base = if base.is_empty() { "calendar".to_string() } else { base };
    format!("{}-{}.ics", base, date.format("%Y-%m-%d"))
}

/// UTC basic format: YYYYMMDDTHHMMSSZ
fn format_utc(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Text fields may not contain raw line breaks.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with ours
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str(PRODID_LINE);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
