//! Calendar event types.
//!
//! A `CalendarEvent` is the unit of scheduled work the store keeps. Callers
//! never choose ids: they hand a `NewEvent` to the repository, which assigns
//! one, and later change it through an `EventPatch`.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalBoardError, CalBoardResult};
use crate::locale::Locale;

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: EventStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Everything needed to create an event, minus the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: EventStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Partial update for an existing event. `None` fields are left untouched.
///
/// `project_id` is doubly optional: `Some(None)` detaches the event from its
/// project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    pub location: Option<String>,
    pub client: Option<String>,
    pub assignees: Option<Vec<Assignee>>,
    pub amount: Option<f64>,
    pub priority: Option<Priority>,
    pub project_id: Option<Option<String>>,
    pub is_recurring: Option<bool>,
    pub tags: Option<BTreeSet<String>>,
}

/// A person shown on an event. Display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
    pub initials: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Which calendar an event type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Engineer,
    Enterprise,
    Unknown,
}

/// Event type. The engineer and enterprise calendars use disjoint sets of
/// values; anything else lands in `Other` so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    // Engineer calendar
    Job,
    Milestone,
    Visit,
    Invoice,
    Call,
    Payout,
    // Enterprise calendar
    Meeting,
    Project,
    Deadline,
    Task,
    Conference,
    Presentation,
    ClientMeeting,
    TeamMeeting,
    Review,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventStatus {
    Draft,
    Open,
    Quoted,
    InProgress,
    Completed,
    Cancelled,
    Scheduled,
    Other(String),
}

impl EventType {
    pub const ENGINEER: [EventType; 6] = [
        EventType::Job,
        EventType::Milestone,
        EventType::Visit,
        EventType::Invoice,
        EventType::Call,
        EventType::Payout,
    ];

    pub const ENTERPRISE: [EventType; 9] = [
        EventType::Meeting,
        EventType::Project,
        EventType::Deadline,
        EventType::Task,
        EventType::Conference,
        EventType::Presentation,
        EventType::ClientMeeting,
        EventType::TeamMeeting,
        EventType::Review,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Job => "job",
            EventType::Milestone => "milestone",
            EventType::Visit => "visit",
            EventType::Invoice => "invoice",
            EventType::Call => "call",
            EventType::Payout => "payout",
            EventType::Meeting => "meeting",
            EventType::Project => "project",
            EventType::Deadline => "deadline",
            EventType::Task => "task",
            EventType::Conference => "conference",
            EventType::Presentation => "presentation",
            EventType::ClientMeeting => "client-meeting",
            EventType::TeamMeeting => "team-meeting",
            EventType::Review => "review",
            EventType::Other(s) => s,
        }
    }

    pub fn family(&self) -> TypeFamily {
        match self {
            EventType::Job
            | EventType::Milestone
            | EventType::Visit
            | EventType::Invoice
            | EventType::Call
            | EventType::Payout => TypeFamily::Engineer,
            EventType::Other(_) => TypeFamily::Unknown,
            _ => TypeFamily::Enterprise,
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "job" => EventType::Job,
            "milestone" => EventType::Milestone,
            "visit" => EventType::Visit,
            "invoice" => EventType::Invoice,
            "call" => EventType::Call,
            "payout" => EventType::Payout,
            "meeting" => EventType::Meeting,
            "project" => EventType::Project,
            "deadline" => EventType::Deadline,
            "task" => EventType::Task,
            "conference" => EventType::Conference,
            "presentation" => EventType::Presentation,
            "client-meeting" => EventType::ClientMeeting,
            "team-meeting" => EventType::TeamMeeting,
            "review" => EventType::Review,
            _ => EventType::Other(value),
        }
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        EventType::from(value.to_string())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EventStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Open => "open",
            EventStatus::Quoted => "quoted",
            EventStatus::InProgress => "in-progress",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Scheduled => "scheduled",
            EventStatus::Other(s) => s,
        }
    }
}

impl From<String> for EventStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => EventStatus::Draft,
            "open" => EventStatus::Open,
            "quoted" => EventStatus::Quoted,
            "in-progress" => EventStatus::InProgress,
            "completed" => EventStatus::Completed,
            "cancelled" => EventStatus::Cancelled,
            "scheduled" => EventStatus::Scheduled,
            _ => EventStatus::Other(value),
        }
    }
}

impl From<&str> for EventStatus {
    fn from(value: &str) -> Self {
        EventStatus::from(value.to_string())
    }
}

impl From<EventStatus> for String {
    fn from(value: EventStatus) -> Self {
        match value {
            EventStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject collections that mix engineer and enterprise event types.
/// Unknown types are ignored.
pub fn ensure_single_family<'a>(types: impl IntoIterator<Item = &'a EventType>) -> CalBoardResult<()> {
    let mut seen: Option<TypeFamily> = None;

    for family in types.into_iter().map(EventType::family) {
        if family == TypeFamily::Unknown {
            continue;
        }
        match seen {
            Some(existing) if existing != family => return Err(CalBoardError::MixedEventTypes),
            _ => seen = Some(family),
        }
    }

    Ok(())
}

fn check_fields(start: DateTime<Utc>, end: DateTime<Utc>, amount: f64) -> CalBoardResult<()> {
    if end < start {
        return Err(CalBoardError::InvalidTimeRange { start, end });
    }
    // NaN fails this too
    if !(amount >= 0.0) {
        return Err(CalBoardError::InvalidAmount(amount));
    }
    Ok(())
}

impl NewEvent {
    /// Build a creation draft for an empty calendar slot.
    ///
    /// With a time the draft lasts one hour; without one it covers the
    /// whole local day and is flagged all-day.
    pub fn draft_at(title: impl Into<String>, date: NaiveDate, time: Option<NaiveTime>, locale: &Locale) -> Self {
        let (start_time, end_time, all_day) = match time {
            Some(t) => {
                let start = locale.localize(date.and_time(t));
                let end = start.checked_add_signed(Duration::hours(1)).unwrap_or(start);
                (start, end, false)
            }
            None => (locale.start_of_day(date), locale.end_of_day(date), true),
        };

        NewEvent {
            title: title.into(),
            description: String::new(),
            start_time,
            end_time,
            all_day,
            event_type: EventType::Job,
            status: EventStatus::Draft,
            location: String::new(),
            client: String::new(),
            assignees: Vec::new(),
            amount: 0.0,
            priority: Priority::Medium,
            project_id: None,
            is_recurring: false,
            tags: BTreeSet::new(),
        }
    }

    pub fn validate(&self) -> CalBoardResult<()> {
        check_fields(self.start_time, self.end_time, self.amount)
    }

    pub fn into_event(self, id: String) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            all_day: self.all_day,
            event_type: self.event_type,
            status: self.status,
            location: self.location,
            client: self.client,
            assignees: self.assignees,
            amount: self.amount,
            priority: self.priority,
            project_id: self.project_id,
            is_recurring: self.is_recurring,
            tags: self.tags,
        }
    }
}

impl From<CalendarEvent> for NewEvent {
    fn from(event: CalendarEvent) -> Self {
        NewEvent {
            title: event.title,
            description: event.description,
            start_time: event.start_time,
            end_time: event.end_time,
            all_day: event.all_day,
            event_type: event.event_type,
            status: event.status,
            location: event.location,
            client: event.client,
            assignees: event.assignees,
            amount: event.amount,
            priority: event.priority,
            project_id: event.project_id,
            is_recurring: event.is_recurring,
            tags: event.tags,
        }
    }
}

impl CalendarEvent {
    pub fn validate(&self) -> CalBoardResult<()> {
        check_fields(self.start_time, self.end_time, self.amount)
    }

    /// Case-insensitive substring match over the searchable text fields.
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        [&self.title, &self.description, &self.client, &self.location]
            .into_iter()
            .chain(self.tags.iter())
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl EventPatch {
    /// Merge the patch into `event`. Returns true if the start time changed.
    pub fn apply(self, event: &mut CalendarEvent) -> bool {
        let start_changed = self
            .start_time
            .is_some_and(|start| start != event.start_time);

        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = end_time;
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(event_type) = self.event_type {
            event.event_type = event_type;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(client) = self.client {
            event.client = client;
        }
        if let Some(assignees) = self.assignees {
            event.assignees = assignees;
        }
        if let Some(amount) = self.amount {
            event.amount = amount;
        }
        if let Some(priority) = self.priority {
            event.priority = priority;
        }
        if let Some(project_id) = self.project_id {
            event.project_id = project_id;
        }
        if let Some(is_recurring) = self.is_recurring {
            event.is_recurring = is_recurring;
        }
        if let Some(tags) = self.tags {
            event.tags = tags;
        }

        start_changed
    }
}
