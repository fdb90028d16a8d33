//! View queries over an already-filtered event slice.
//!
//! All calendar-date comparisons happen in the locale's time zone. The
//! slices passed in are assumed sorted by start time, so every result is too.

use chrono::{Datelike, Duration, NaiveDate};

use crate::date_range::DateRange;
use crate::error::{CalBoardError, CalBoardResult};
use crate::event::CalendarEvent;
use crate::locale::Locale;

/// Number of cells in a month grid: six full weeks.
pub const MONTH_GRID_CELLS: usize = 42;

/// One day of a grid or agenda with the events that start on it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<'a> {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub events: Vec<&'a CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourSlot<'a> {
    pub hour: u32,
    pub events: Vec<&'a CalendarEvent>,
}

/// A single day split into all-day events and 24 hourly slots.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTimeline<'a> {
    pub date: NaiveDate,
    pub all_day: Vec<&'a CalendarEvent>,
    pub hours: Vec<HourSlot<'a>>,
}

fn in_range<'a>(events: &'a [CalendarEvent], range: &DateRange) -> Vec<&'a CalendarEvent> {
    events.iter().filter(|e| range.contains(e.start_time)).collect()
}

/// Events starting on `date`, ignoring time of day.
pub fn events_on_day<'a>(events: &'a [CalendarEvent], date: NaiveDate, locale: &Locale) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|e| locale.same_day(e.start_time, date))
        .collect()
}

/// Events starting in the seven days from `week_start`.
pub fn events_in_week<'a>(
    events: &'a [CalendarEvent],
    week_start: NaiveDate,
    locale: &Locale,
) -> Vec<&'a CalendarEvent> {
    in_range(events, &DateRange::week(week_start, locale))
}

/// Events starting in the calendar month containing `date`.
pub fn events_in_month<'a>(events: &'a [CalendarEvent], date: NaiveDate, locale: &Locale) -> Vec<&'a CalendarEvent> {
    in_range(events, &DateRange::month(date, locale))
}

/// Events tied to `project_id`, in start-time order.
pub fn events_for_project<'a>(events: &'a [CalendarEvent], project_id: &str) -> Vec<&'a CalendarEvent> {
    let mut matching: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| e.project_id.as_deref() == Some(project_id))
        .collect();
    matching.sort_by_key(|e| e.start_time);
    matching
}

fn sunday_on_or_before(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_sunday())))
}

/// The Sunday on or before `date`, clamped to the earliest representable date.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    sunday_on_or_before(date).unwrap_or(NaiveDate::MIN)
}

/// `date` moved forward `days` days, clamped to the latest representable date.
pub(crate) fn days_after(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(NaiveDate::MAX)
}

/// The 42 dates shown for a month: six weeks starting from the Sunday on or
/// before the 1st, spilling into the neighbouring months.
pub fn month_grid_dates(year: i32, month: u32) -> CalBoardResult<Vec<NaiveDate>> {
    let no_grid = || CalBoardError::InvalidDate(format!("No month grid for {year}-{month:02}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(no_grid)?;
    let start = sunday_on_or_before(first).ok_or_else(no_grid)?;

    (0..MONTH_GRID_CELLS as i64)
        .map(|offset| start.checked_add_signed(Duration::days(offset)).ok_or_else(no_grid))
        .collect()
}

pub fn month_grid<'a>(
    events: &'a [CalendarEvent],
    year: i32,
    month: u32,
    today: NaiveDate,
    locale: &Locale,
) -> CalBoardResult<Vec<GridCell<'a>>> {
    let dates = month_grid_dates(year, month)?;
    let mut cells: Vec<GridCell<'a>> = dates
        .iter()
        .map(|&date| GridCell {
            date,
            in_current_month: date.month() == month && date.year() == year,
            is_today: date == today,
            events: Vec::new(),
        })
        .collect();

    let first_shown = dates[0];
    for event in events {
        let offset = (locale.local_date(event.start_time) - first_shown).num_days();
        if let Ok(index) = usize::try_from(offset)
            && let Some(cell) = cells.get_mut(index)
        {
            cell.events.push(event);
        }
    }

    Ok(cells)
}

/// Seven day buckets from `week_start`. Near the end of the calendar the
/// week is cut short.
pub fn week_grid<'a>(events: &'a [CalendarEvent], week_start: NaiveDate, locale: &Locale) -> Vec<DayBucket<'a>> {
    (0..7)
        .map_while(|offset| week_start.checked_add_signed(Duration::days(offset)))
        .map(|date| DayBucket {
            date,
            events: events_on_day(events, date, locale),
        })
        .collect()
}

pub fn day_timeline<'a>(events: &'a [CalendarEvent], date: NaiveDate, locale: &Locale) -> DayTimeline<'a> {
    let mut timeline = DayTimeline {
        date,
        all_day: Vec::new(),
        hours: (0..24).map(|hour| HourSlot { hour, events: Vec::new() }).collect(),
    };

    for event in events_on_day(events, date, locale) {
        if event.all_day {
            timeline.all_day.push(event);
            continue;
        }
        let hour = locale.local_hour(event.start_time) as usize;
        if let Some(slot) = timeline.hours.get_mut(hour) {
            slot.events.push(event);
        }
    }

    timeline
}

/// Group start-time-sorted events by local start date, skipping empty days.
pub fn group_by_day<'a>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    locale: &Locale,
) -> Vec<DayBucket<'a>> {
    let mut buckets: Vec<DayBucket<'a>> = Vec::new();

    for event in events {
        let date = locale.local_date(event.start_time);
        match buckets.last_mut() {
            Some(bucket) if bucket.date == date => bucket.events.push(event),
            _ => buckets.push(DayBucket {
                date,
                events: vec![event],
            }),
        }
    }

    buckets
}

/// Days from `from` (inclusive) over `days` days that have at least one event.
/// The window stops at the latest representable date.
pub fn agenda<'a>(events: &'a [CalendarEvent], from: NaiveDate, days: u32, locale: &Locale) -> Vec<DayBucket<'a>> {
    if days == 0 {
        return Vec::new();
    }

    let last = days_after(from, i64::from(days) - 1);
    let range = DateRange::new(locale.start_of_day(from), locale.end_of_day(last));
    group_by_day(in_range(events, &range), locale)
}
