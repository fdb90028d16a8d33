//! Time zone and currency settings used for every calendar-date calculation.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::lookup::CurrencyFormat;

#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    pub timezone: Tz,
    pub currency: CurrencyFormat,
}

impl Default for Locale {
    fn default() -> Self {
        Locale {
            timezone: Tz::UTC,
            currency: CurrencyFormat::default(),
        }
    }
}

impl Locale {
    pub fn new(timezone: Tz) -> Self {
        Locale {
            timezone,
            ..Default::default()
        }
    }

    /// Calendar date of an instant in this time zone.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.timezone).date_naive()
    }

    /// Hour of day (0-23) of an instant in this time zone.
    pub fn local_hour(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.timezone).hour()
    }

    pub fn same_day(&self, at: DateTime<Utc>, date: NaiveDate) -> bool {
        self.local_date(at) == date
    }

    /// Resolve a wall-clock time in this zone to an instant.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant. Times that
    /// do not exist (DST spring-forward gap) are pushed forward one hour.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => naive
                .checked_add_signed(Duration::hours(1))
                .and_then(|later| self.timezone.from_local_datetime(&later).earliest())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc()),
        }
    }

    /// Local midnight at the start of `date`.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.localize(date.and_time(NaiveTime::MIN))
    }

    /// Last millisecond of `date` (23:59:59.999 local).
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        match date.succ_opt() {
            Some(next) => self
                .start_of_day(next)
                .checked_sub_signed(Duration::milliseconds(1))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    pub fn format_currency(&self, amount: f64) -> String {
        self.currency.format(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_in_utc() {
        let locale = Locale::default();
        let date = NaiveDate::from_ymd_opt(2025, 9, 16).unwrap();

        assert_eq!(
            locale.start_of_day(date),
            Utc.with_ymd_and_hms(2025, 9, 16, 0, 0, 0).unwrap()
        );
        assert_eq!(
            locale.end_of_day(date),
            Utc.with_ymd_and_hms(2025, 9, 17, 0, 0, 0).unwrap() - Duration::milliseconds(1)
        );
    }

    #[test]
    fn test_day_bounds_follow_timezone() {
        let locale = Locale::new(chrono_tz::Asia::Riyadh);
        let date = NaiveDate::from_ymd_opt(2025, 9, 16).unwrap();

        // Riyadh is UTC+3 year round
        assert_eq!(
            locale.start_of_day(date),
            Utc.with_ymd_and_hms(2025, 9, 15, 21, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let locale = Locale::new(chrono_tz::Asia::Riyadh);
        let at = Utc.with_ymd_and_hms(2025, 9, 16, 22, 30, 0).unwrap();

        assert_eq!(locale.local_date(at), NaiveDate::from_ymd_opt(2025, 9, 17).unwrap());
        assert_eq!(locale.local_hour(at), 1);
        assert!(!Locale::default().same_day(at, NaiveDate::from_ymd_opt(2025, 9, 17).unwrap()));
    }

    #[test]
    fn test_localize_skips_dst_gap() {
        let locale = Locale::new(chrono_tz::America::New_York);
        // 2025-03-09 02:30 does not exist in New York
        let naive = NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();

        assert_eq!(
            locale.localize(naive),
            Utc.with_ymd_and_hms(2025, 3, 9, 7, 30, 0).unwrap()
        );
    }
}
