//! Date range for filtering events.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalBoardError, CalBoardResult};
use crate::locale::Locale;
use crate::query::days_after;

/// Inclusive bounds on an event's start time.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Parse YYYY-MM-DD bounds in the locale's time zone.
    /// - `from`: start of that day, or unbounded when absent
    /// - `to`: end of that day, or unbounded when absent
    pub fn from_args(from: Option<&str>, to: Option<&str>, locale: &Locale) -> CalBoardResult<Self> {
        let start = from
            .map(|s| parse_date(s).map(|d| locale.start_of_day(d)))
            .transpose()?;
        let end = to
            .map(|s| parse_date(s).map(|d| locale.end_of_day(d)))
            .transpose()?;

        Ok(DateRange { start, end })
    }

    /// Seven local days beginning at `week_start`.
    pub fn week(week_start: NaiveDate, locale: &Locale) -> Self {
        let last = days_after(week_start, 6);
        DateRange::new(locale.start_of_day(week_start), locale.end_of_day(last))
    }

    /// The calendar month containing `date`, first to last day.
    pub fn month(date: NaiveDate, locale: &Locale) -> Self {
        let first = first_of_month(date);
        DateRange::new(locale.start_of_day(first), locale.end_of_day(last_of_month(date)))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if self.start.is_some_and(|start| at < start) {
            return false;
        }
        if self.end.is_some_and(|end| at > end) {
            return false;
        }
        true
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> CalBoardResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        CalBoardError::InvalidDate(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_from_args_covers_whole_days() {
        let range = DateRange::from_args(Some("2025-09-01"), Some("2025-09-30"), &Locale::default()).unwrap();

        assert_eq!(range.start, Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2025, 9, 30, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_from_args_rejects_bad_dates() {
        assert!(matches!(
            DateRange::from_args(Some("09/01/2025"), None, &Locale::default()),
            Err(CalBoardError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_unbounded_contains_everything() {
        let range = DateRange::default();
        assert!(range.is_unbounded());
        assert!(range.contains(DateTime::<Utc>::MIN_UTC));
        assert!(range.contains(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_inverted_range_contains_nothing() {
        let a = Utc.with_ymd_and_hms(2025, 9, 20, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 9, 10, 0, 0, 0).unwrap();
        let range = DateRange::new(a, b);

        assert!(!range.contains(Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap()));
        assert!(!range.contains(a));
        assert!(!range.contains(b));
    }

    #[test]
    fn test_month_uses_real_month_length() {
        let locale = Locale::default();
        let feb = DateRange::month(d(2024, 2, 17), &locale);

        assert_eq!(feb.start, Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert_eq!(
            feb.end,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() - Duration::milliseconds(1))
        );
        assert_eq!(last_of_month(d(2025, 2, 3)), d(2025, 2, 28));
        assert_eq!(last_of_month(d(2025, 12, 31)), d(2025, 12, 31));
    }

    #[test]
    fn test_week_at_calendar_end_is_clamped() {
        let week = DateRange::week(NaiveDate::MAX, &Locale::default());
        assert_eq!(week.end, Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_week_spans_seven_days() {
        let locale = Locale::default();
        let week = DateRange::week(d(2025, 9, 14), &locale);

        assert!(week.contains(Utc.with_ymd_and_hms(2025, 9, 20, 23, 59, 59).unwrap()));
        assert!(!week.contains(Utc.with_ymd_and_hms(2025, 9, 21, 0, 0, 0).unwrap()));
        assert!(!week.contains(Utc.with_ymd_and_hms(2025, 9, 13, 23, 59, 59).unwrap()));
    }
}
