//! Calendar view state: which mode is shown, around which date, and which
//! event is selected.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CalBoardError;
use crate::query::{days_after, week_start_for};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
    Agenda,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
            ViewMode::Agenda => "agenda",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CalBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            "day" => Ok(ViewMode::Day),
            "agenda" => Ok(ViewMode::Agenda),
            other => Err(CalBoardError::Config(format!(
                "Unknown view '{other}'. Expected month, week, day or agenda"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub current_date: NaiveDate,
    pub mode: ViewMode,
    pub selected_event: Option<String>,
    /// Length of one agenda page in days
    pub agenda_days: u32,
}

impl ViewState {
    pub fn new(current_date: NaiveDate, mode: ViewMode, agenda_days: u32) -> Self {
        ViewState {
            current_date,
            mode,
            selected_event: None,
            agenda_days,
        }
    }

    /// Date one period forward (`forward`) or back from the current date.
    /// Month steps clamp to the last valid day of the target month.
    pub fn step(&self, forward: bool) -> NaiveDate {
        let date = self.current_date;
        let shifted = match self.mode {
            ViewMode::Month => {
                if forward {
                    date.checked_add_months(Months::new(1))
                } else {
                    date.checked_sub_months(Months::new(1))
                }
            }
            ViewMode::Week => shift_days(date, 7, forward),
            ViewMode::Day => shift_days(date, 1, forward),
            ViewMode::Agenda => shift_days(date, i64::from(self.agenda_days.max(1)), forward),
        };
        shifted.unwrap_or(date)
    }

    /// Heading for the current period, e.g. "September 2025".
    pub fn period_label(&self) -> String {
        let date = self.current_date;
        match self.mode {
            ViewMode::Month => date.format("%B %Y").to_string(),
            ViewMode::Week => {
                let start = week_start_for(date);
                let end = days_after(start, 6);
                format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
            }
            ViewMode::Day => date.format("%A, %B %-d, %Y").to_string(),
            ViewMode::Agenda => format!("Agenda from {}", date.format("%b %-d, %Y")),
        }
    }
}

fn shift_days(date: NaiveDate, days: i64, forward: bool) -> Option<NaiveDate> {
    let delta = Duration::days(days);
    if forward {
        date.checked_add_signed(delta)
    } else {
        date.checked_sub_signed(delta)
    }
}
