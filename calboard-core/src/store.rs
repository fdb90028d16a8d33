//! Observable calendar store.
//!
//! `CalendarStore` ties the repository, the active filters and the view
//! state together. The visible set is recomputed after every mutation and
//! filter change, and subscribers are told what changed once the cache is
//! up to date.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::clock::Clock;
use crate::error::CalBoardResult;
use crate::event::{CalendarEvent, EventPatch, EventStatus, EventType, NewEvent};
use crate::filter::{CalendarFilters, FilterUpdate, compute_visible};
use crate::ics;
use crate::locale::Locale;
use crate::lookup;
use crate::query::{self, DayBucket, DayTimeline, GridCell};
use crate::repository::{EventRecord, EventRepository};
use crate::view::{ViewMode, ViewState};

const DEFAULT_AGENDA_DAYS: u32 = 14;

/// What a store mutation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    EventAdded(String),
    EventUpdated(String),
    EventDeleted(String),
    FiltersChanged,
    ViewChanged,
    SelectionChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreChange)>;

pub struct CalendarStore {
    repository: EventRepository,
    filters: CalendarFilters,
    visible: Vec<CalendarEvent>,
    view: ViewState,
    locale: Locale,
    clock: Box<dyn Clock>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for CalendarStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarStore")
            .field("events", &self.repository.len())
            .field("visible", &self.visible.len())
            .field("filters", &self.filters)
            .field("view", &self.view)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CalendarStore {
    /// An empty store positioned on today's date in month view.
    pub fn new(locale: Locale, clock: impl Clock + 'static) -> Self {
        let today = locale.local_date(clock.now());
        CalendarStore {
            repository: EventRepository::new(),
            filters: CalendarFilters::default(),
            visible: Vec::new(),
            view: ViewState::new(today, ViewMode::default(), DEFAULT_AGENDA_DAYS),
            locale,
            clock: Box::new(clock),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// A store seeded with `events`, each given a fresh id.
    pub fn with_events(
        locale: Locale,
        clock: impl Clock + 'static,
        events: impl IntoIterator<Item = NewEvent>,
    ) -> CalBoardResult<Self> {
        let records = events
            .into_iter()
            .map(|event| EventRecord { id: None, event })
            .collect();
        Self::load(locale, clock, records)
    }

    /// A store seeded from stored records, keeping their ids.
    pub fn load(locale: Locale, clock: impl Clock + 'static, records: Vec<EventRecord>) -> CalBoardResult<Self> {
        let mut store = Self::new(locale, clock);
        store.repository = EventRepository::load(records)?;
        store.recompute();
        Ok(store)
    }

    pub fn with_view(mut self, mode: ViewMode, agenda_days: u32) -> Self {
        self.view.mode = mode;
        self.view.agenda_days = agenda_days.max(1);
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn today(&self) -> NaiveDate {
        self.locale.local_date(self.clock.now())
    }

    // Subscriptions

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        tracing::trace!(?change, listeners = self.listeners.len(), "notify");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }

    fn recompute(&mut self) {
        self.visible = compute_visible(self.repository.events(), &self.filters);
        tracing::debug!(
            total = self.repository.len(),
            visible = self.visible.len(),
            "visible events recomputed"
        );
    }

    // Events

    pub fn add_event(&mut self, event: NewEvent) -> CalBoardResult<CalendarEvent> {
        let stored = self.repository.add(event)?;
        self.recompute();
        self.notify(StoreChange::EventAdded(stored.id.clone()));
        Ok(stored)
    }

    /// Returns `Ok(false)` without notifying when `id` is unknown.
    pub fn update_event(&mut self, id: &str, patch: EventPatch) -> CalBoardResult<bool> {
        if !self.repository.update(id, patch)? {
            return Ok(false);
        }
        self.recompute();
        self.notify(StoreChange::EventUpdated(id.to_string()));
        Ok(true)
    }

    /// Deleting an unknown id is a no-op and returns false.
    pub fn delete_event(&mut self, id: &str) -> bool {
        if !self.repository.delete(id) {
            return false;
        }
        self.recompute();
        self.notify(StoreChange::EventDeleted(id.to_string()));

        if self.view.selected_event.as_deref() == Some(id) {
            self.view.selected_event = None;
            self.notify(StoreChange::SelectionChanged);
        }
        true
    }

    pub fn get_event(&self, id: &str) -> Option<&CalendarEvent> {
        self.repository.get(id)
    }

    /// The canonical collection, sorted by start time.
    pub fn events(&self) -> &[CalendarEvent] {
        self.repository.events()
    }

    /// The filtered collection, sorted by start time.
    pub fn visible_events(&self) -> &[CalendarEvent] {
        &self.visible
    }

    pub fn to_records(&self) -> Vec<EventRecord> {
        self.repository.to_records()
    }

    // Filters

    pub fn filters(&self) -> &CalendarFilters {
        &self.filters
    }

    pub fn update_filters(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
        self.recompute();
        self.notify(StoreChange::FiltersChanged);
    }

    pub fn clear_filters(&mut self) {
        self.filters = CalendarFilters::default();
        self.recompute();
        self.notify(StoreChange::FiltersChanged);
    }

    // Queries over the visible set

    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        query::events_on_day(&self.visible, date, &self.locale)
    }

    pub fn events_for_week(&self, week_start: NaiveDate) -> Vec<&CalendarEvent> {
        query::events_in_week(&self.visible, week_start, &self.locale)
    }

    pub fn events_for_month(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        query::events_in_month(&self.visible, date, &self.locale)
    }

    /// The month's visible events grouped by day, skipping empty days.
    pub fn month_days(&self, date: NaiveDate) -> Vec<DayBucket<'_>> {
        query::group_by_day(self.events_for_month(date), &self.locale)
    }

    /// All of a project's events, whatever the active filters.
    pub fn events_for_project(&self, project_id: &str) -> Vec<&CalendarEvent> {
        query::events_for_project(self.repository.events(), project_id)
    }

    pub fn month_grid(&self, year: i32, month: u32) -> CalBoardResult<Vec<GridCell<'_>>> {
        query::month_grid(&self.visible, year, month, self.today(), &self.locale)
    }

    pub fn week_grid(&self, week_start: NaiveDate) -> Vec<DayBucket<'_>> {
        query::week_grid(&self.visible, week_start, &self.locale)
    }

    pub fn day_timeline(&self, date: NaiveDate) -> DayTimeline<'_> {
        query::day_timeline(&self.visible, date, &self.locale)
    }

    pub fn agenda(&self, from: NaiveDate, days: u32) -> Vec<DayBucket<'_>> {
        query::agenda(&self.visible, from, days, &self.locale)
    }

    /// Events shown by the current view around the current date.
    pub fn events_in_view(&self) -> Vec<&CalendarEvent> {
        let date = self.view.current_date;
        match self.view.mode {
            ViewMode::Month => self.events_for_month(date),
            ViewMode::Week => self.events_for_week(query::week_start_for(date)),
            ViewMode::Day => self.events_for_date(date),
            ViewMode::Agenda => self
                .agenda(date, self.view.agenda_days)
                .into_iter()
                .flat_map(|bucket| bucket.events)
                .collect(),
        }
    }

    // Lookups

    pub fn event_type_color(&self, event_type: &EventType) -> &'static str {
        lookup::color_for_type(event_type)
    }

    pub fn status_color(&self, status: &EventStatus) -> &'static str {
        lookup::color_for_status(status)
    }

    pub fn format_currency(&self, amount: f64) -> String {
        self.locale.format_currency(amount)
    }

    // View state

    pub fn current_date(&self) -> NaiveDate {
        self.view.current_date
    }

    pub fn view(&self) -> ViewMode {
        self.view.mode
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        if self.view.mode != mode {
            self.view.mode = mode;
            self.notify(StoreChange::ViewChanged);
        }
    }

    pub fn set_current_date(&mut self, date: NaiveDate) {
        if self.view.current_date != date {
            self.view.current_date = date;
            self.notify(StoreChange::ViewChanged);
        }
    }

    pub fn go_to_today(&mut self) {
        self.set_current_date(self.today());
    }

    pub fn next_period(&mut self) {
        self.set_current_date(self.view.step(true));
    }

    pub fn previous_period(&mut self) {
        self.set_current_date(self.view.step(false));
    }

    pub fn period_label(&self) -> String {
        self.view.period_label()
    }

    /// Select an event by id. Ids not in the store clear the selection.
    pub fn select_event(&mut self, id: Option<&str>) {
        let selected = id
            .filter(|id| self.repository.get(id).is_some())
            .map(str::to_string);

        if self.view.selected_event != selected {
            self.view.selected_event = selected;
            self.notify(StoreChange::SelectionChanged);
        }
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.view
            .selected_event
            .as_deref()
            .and_then(|id| self.repository.get(id))
    }

    /// The month shown by the month view, as (year, month).
    pub fn current_month(&self) -> (i32, u32) {
        (self.view.current_date.year(), self.view.current_date.month())
    }

    // Export

    /// The visible set as iCalendar text, stamped with the clock's time.
    pub fn export_ics(&self) -> CalBoardResult<String> {
        ics::export_ics(&self.visible, self.clock.now())
    }
}
