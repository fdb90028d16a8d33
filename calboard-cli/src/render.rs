//! Terminal rendering for calboard types.
//!
//! Colors come from the same lookup tables the other views use: the
//! `text-<color>` class of an event's style picks the terminal color.

use calboard_core::lookup::{color_for_status, color_for_type};
use calboard_core::query::{DayBucket, GridCell};
use calboard_core::{CalendarEvent, Locale};
use chrono::{Datelike, NaiveDate};
use owo_colors::{AnsiColors, OwoColorize};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self, locale: &Locale) -> String;
}

impl Render for CalendarEvent {
    fn render(&self, locale: &Locale) -> String {
        let time = format_time(self, locale);
        let kind = format!("[{}]", self.event_type);
        let status = self.status.to_string();

        let mut line = format!(
            "  {} {} {} {}",
            time,
            self.title,
            kind.color(style_color(color_for_type(&self.event_type))),
            status.color(style_color(color_for_status(&self.status)))
        );

        if self.amount > 0.0 {
            line.push_str(&format!(" {}", locale.format_currency(self.amount)));
        }
        if !self.location.is_empty() {
            line.push_str(&format!(" {}", format!("@ {}", self.location).dimmed()));
        }
        line.push_str(&format!(" {}", self.id.dimmed()));
        line
    }
}

/// Map a style class list to a terminal color via its `text-<color>-<shade>` class.
pub fn style_color(style: &str) -> AnsiColors {
    let color = style
        .split_whitespace()
        .find_map(|class| class.strip_prefix("text-"))
        .and_then(|rest| rest.split('-').next())
        .unwrap_or("gray");

    match color {
        "blue" | "indigo" | "sky" => AnsiColors::Blue,
        "purple" | "violet" | "pink" => AnsiColors::Magenta,
        "green" | "emerald" => AnsiColors::Green,
        "amber" | "yellow" | "orange" => AnsiColors::Yellow,
        "red" => AnsiColors::Red,
        "teal" | "cyan" => AnsiColors::Cyan,
        _ => AnsiColors::White,
    }
}

/// Format the time portion of an event (e.g. "15:00" or "all-day")
pub fn format_time(event: &CalendarEvent, locale: &Locale) -> String {
    if event.all_day {
        return format!("{:>7}", "all-day");
    }
    let local = event.start_time.with_timezone(&locale.timezone);
    format!("{:>7}", local.format("%H:%M"))
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Events grouped under a bold heading per day.
pub fn render_days(buckets: &[DayBucket], today: NaiveDate, locale: &Locale) -> String {
    let mut lines = Vec::new();

    for bucket in buckets.iter().filter(|b| !b.events.is_empty()) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_date_label(bucket.date, today).bold().to_string());
        lines.extend(bucket.events.iter().map(|e| e.render(locale)));
    }

    if lines.is_empty() {
        return "No events found".dimmed().to_string();
    }
    lines.join("\n")
}

const CELL_WIDTH: usize = 6;

/// A month grid, one row per week, with event counts next to each day.
pub fn render_month_grid(cells: &[GridCell]) -> String {
    let header: Vec<String> = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
        .iter()
        .map(|d| format!("{:<width$}", d, width = CELL_WIDTH))
        .collect();

    let mut lines = vec![header.concat().trim_end().dimmed().to_string()];

    for week in cells.chunks(7) {
        let row: Vec<String> = week.iter().map(render_cell).collect();
        lines.push(row.concat());
    }

    lines.join("\n")
}

fn render_cell(cell: &GridCell) -> String {
    let count = if cell.events.is_empty() {
        String::new()
    } else {
        format!("+{}", cell.events.len())
    };
    let text = format!("{:>2}{:<3}", cell.date.day(), count);
    let padded = format!("{:<width$}", text, width = CELL_WIDTH);

    if cell.is_today {
        padded.reversed().to_string()
    } else if !cell.in_current_month {
        padded.dimmed().to_string()
    } else if !cell.events.is_empty() {
        padded.bold().to_string()
    } else {
        padded
    }
}
