//! Canonical event collection.
//!
//! Events are kept sorted by start time; ties keep insertion order. A
//! repository never holds engineer and enterprise event types together.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CalBoardError, CalBoardResult};
use crate::event::{CalendarEvent, EventPatch, EventType, NewEvent, ensure_single_family};

/// An event as read from an event file: it keeps its id if it already has
/// one, otherwise the repository assigns one on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub event: NewEvent,
}

#[derive(Debug, Clone, Default)]
pub struct EventRepository {
    events: Vec<CalendarEvent>,
}

impl EventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from records, keeping ids that are present.
    pub fn load(records: Vec<EventRecord>) -> CalBoardResult<Self> {
        ensure_single_family(records.iter().map(|r| &r.event.event_type))?;

        let mut repository = EventRepository::new();
        let mut seen: HashSet<String> = HashSet::new();

        // Stored ids first, so fresh ids can be checked against all of them
        let (stored, fresh): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.id.is_some());

        for record in stored {
            let Some(id) = record.id else { continue };
            if !seen.insert(id.clone()) {
                return Err(CalBoardError::DuplicateId(id));
            }
            record.event.validate()?;
            repository.events.push(record.event.into_event(id));
        }

        for record in fresh {
            record.event.validate()?;
            let id = repository.next_id();
            repository.events.push(record.event.into_event(id));
        }

        repository.sort();
        Ok(repository)
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Store a new event under a fresh id and return the stored copy.
    pub fn add(&mut self, new_event: NewEvent) -> CalBoardResult<CalendarEvent> {
        new_event.validate()?;
        self.check_family(&new_event.event_type, None)?;

        let event = new_event.into_event(self.next_id());
        self.events.push(event.clone());
        self.sort();

        tracing::debug!(event_id = %event.id, title = %event.title, "event added");
        Ok(event)
    }

    /// Merge `patch` into the event with `id`.
    ///
    /// Returns `Ok(false)` if there is no such event. If the merged event
    /// is invalid or would mix type families, nothing is changed.
    pub fn update(&mut self, id: &str, patch: EventPatch) -> CalBoardResult<bool> {
        let Some(index) = self.events.iter().position(|e| e.id == id) else {
            tracing::debug!(event_id = %id, "update for unknown event ignored");
            return Ok(false);
        };

        let mut updated = self.events[index].clone();
        let start_changed = patch.apply(&mut updated);
        updated.validate()?;
        self.check_family(&updated.event_type, Some(id))?;
        self.events[index] = updated;

        if start_changed {
            self.sort();
        }

        tracing::debug!(event_id = %id, start_changed, "event updated");
        Ok(true)
    }

    /// Remove the event with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() != before;

        if removed {
            tracing::debug!(event_id = %id, "event deleted");
        }
        removed
    }

    /// Records suitable for writing back to an event file.
    pub fn to_records(&self) -> Vec<EventRecord> {
        self.events
            .iter()
            .cloned()
            .map(|event| {
                let id = event.id.clone();
                EventRecord {
                    id: Some(id),
                    event: NewEvent::from(event),
                }
            })
            .collect()
    }

    /// Check `candidate` against every stored type except the event `skip`.
    fn check_family(&self, candidate: &EventType, skip: Option<&str>) -> CalBoardResult<()> {
        let stored = self
            .events
            .iter()
            .filter(|e| Some(e.id.as_str()) != skip)
            .map(|e| &e.event_type);
        ensure_single_family(stored.chain(std::iter::once(candidate)))
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn sort(&mut self) {
        // sort_by_key is stable, so equal start times keep insertion order
        self.events.sort_by_key(|e| e.start_time);
    }
}
