use anyhow::{Context as _, Result};
use calboard_core::{EventStatus, EventType, Locale, NewEvent, TypeFamily};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::context::Context;

pub struct NewArgs {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub client: Option<String>,
    pub project: Option<String>,
    pub amount: Option<f64>,
}

/// A parsed date or date/time as typed by the user, in local time.
#[derive(Debug, Clone, Copy, PartialEq)]
enum When {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl When {
    fn date(&self) -> NaiveDate {
        match self {
            When::Date(d) => *d,
            When::DateTime(dt) => dt.date(),
        }
    }
}

pub fn run(ctx: &mut Context, args: NewArgs) -> Result<()> {
    let interactive = args.title.is_none() || args.start.is_none();

    // --- Title ---
    let title = match args.title {
        Some(t) => t,
        None => Input::<String>::new().with_prompt("  Title").interact_text()?,
    };

    // --- Start ---
    let start = match &args.start {
        Some(s) => parse_datetime(s)?,
        None => prompt_with_retry("  When?", parse_datetime)?,
    };

    let locale = ctx.store.locale().clone();
    let time = match start {
        When::DateTime(dt) => Some(dt.time()),
        When::Date(_) => None,
    };
    let mut draft = NewEvent::draft_at(title, start.date(), time, &locale);

    // --- Duration / End ---
    if let Some(end_input) = &args.end {
        draft.end_time = end_instant(parse_end(end_input, &start)?, &locale);
    } else if let Some(dur_input) = &args.duration {
        draft.end_time = apply_duration(&draft, dur_input, &locale)?;
    } else if interactive {
        draft.end_time = prompt_duration(&draft, &start, &locale)?;
    }

    // --- Details ---
    if let Some(event_type) = args.event_type {
        draft.event_type = EventType::from(event_type.to_lowercase());
    }
    if let Some(status) = args.status {
        draft.status = EventStatus::from(status.to_lowercase());
    }
    draft.location = args.location.unwrap_or_default();
    draft.client = args.client.unwrap_or_default();
    draft.project_id = args.project.filter(|p| !p.is_empty());
    draft.amount = args.amount.unwrap_or(0.0);

    let event_type = draft.event_type.clone();
    if event_type.family() == TypeFamily::Unknown {
        tracing::warn!(%event_type, "unknown event type");
    }

    let stored = ctx
        .store
        .add_event(draft)
        .with_context(|| format!("Cannot add a '{}' event to this calendar", event_type))?;
    ctx.save()?;

    if interactive {
        println!();
    }
    println!("{}", format!("  Created: {}", stored.title).green());
    println!("  {}", stored.id.dimmed());

    Ok(())
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<F>(prompt: &str, parse: F) -> Result<When>
where
    F: Fn(&str) -> Result<When>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

/// Prompt for duration/end with retry on parse errors. Empty input keeps the draft's end.
fn prompt_duration(draft: &NewEvent, start: &When, locale: &Locale) -> Result<DateTime<Utc>> {
    let default_hint = if draft.all_day { "all day" } else { "1 hour" };
    loop {
        let input: String = Input::new()
            .with_prompt(format!("  How long? ({})", default_hint))
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.is_empty() {
            return Ok(draft.end_time);
        }
        if let Ok(end) = apply_duration(draft, &input, locale) {
            return Ok(end);
        }
        match parse_end(&input, start) {
            Ok(end) => return Ok(end_instant(end, locale)),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    lower_words(input)
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| (*full).to_string())
                .unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lower_words(input: &str) -> impl Iterator<Item = String> + '_ {
    input.split_whitespace().map(str::to_lowercase)
}

/// Parse a natural language date/time. Inputs with a time token (am/pm,
/// HH:MM, noon, midnight, "at N") give a timed start, others a whole day.
fn parse_datetime(input: &str) -> Result<When> {
    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    if has_time_component(input) {
        Ok(When::DateTime(dt))
    } else {
        Ok(When::Date(dt.date()))
    }
}

/// Check if the user's input string contains time-related tokens.
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    // am/pm right after a digit, optionally with one space: "6pm", "3 pm"
    let bytes = lower.as_bytes();
    for (i, window) in bytes.windows(2).enumerate() {
        if (window == b"am" || window == b"pm")
            && ((i > 0 && bytes[i - 1].is_ascii_digit())
                || (i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit()))
        {
            return true;
        }
    }

    // HH:MM
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':'
            && i > 0
            && bytes[i - 1].is_ascii_digit()
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
        {
            return true;
        }
    }

    // "at 3", "friday at 15"
    let after_at = lower
        .find(" at ")
        .map(|pos| &lower[pos + 4..])
        .or_else(|| lower.strip_prefix("at "));
    after_at.is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Parse an end input: a bare time on the start's day, or any date/time.
fn parse_end(input: &str, start: &When) -> Result<When> {
    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    let parsed = parse_datetime(cleaned)?;

    // "5pm" alone means 5pm on the start day
    if let (When::DateTime(end), true) = (parsed, is_bare_time(cleaned)) {
        return Ok(When::DateTime(start.date().and_time(end.time())));
    }
    Ok(parsed)
}

fn is_bare_time(input: &str) -> bool {
    !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_digit() || c == ':' || c == ' ' || "apm".contains(c.to_ascii_lowercase()))
}

/// End instant for a parsed end: a date means through the end of that day.
fn end_instant(end: When, locale: &Locale) -> DateTime<Utc> {
    match end {
        When::Date(d) => locale.end_of_day(d),
        When::DateTime(dt) => locale.localize(dt),
    }
}

/// Apply a duration string to a draft. All-day drafts cover whole days.
fn apply_duration(draft: &NewEvent, dur_input: &str, locale: &Locale) -> Result<DateTime<Utc>> {
    let std_dur = humantime::parse_duration(dur_input)
        .with_context(|| format!("Could not parse duration: \"{}\"", dur_input))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;

    if draft.all_day {
        let days = chrono_dur.num_days().max(1);
        let last = locale
            .local_date(draft.start_time)
            .checked_add_signed(Duration::days(days - 1))
            .context("Duration too large")?;
        return Ok(locale.end_of_day(last));
    }
    draft
        .start_time
        .checked_add_signed(chrono_dur)
        .context("Duration too large")
}
