use anyhow::Result;
use calboard_core::ViewMode;
use calboard_core::date_range::parse_date;
use calboard_core::query::week_start_for;
use owo_colors::OwoColorize;

use super::FilterArgs;
use crate::context::Context;
use crate::render::{Render, render_days};

pub fn run(ctx: &mut Context, view: Option<&str>, date: Option<&str>, filters: &FilterArgs) -> Result<()> {
    let store = &mut ctx.store;

    if let Some(view) = view {
        store.set_view(view.parse::<ViewMode>()?);
    }
    if let Some(date) = date {
        store.set_current_date(parse_date(date)?);
    }
    filters.apply(store)?;

    let today = store.today();
    let current = store.current_date();
    let locale = store.locale();

    println!("{}", store.period_label().bold());
    println!();

    let output = match store.view() {
        ViewMode::Month => render_days(&store.month_days(current), today, locale),
        ViewMode::Week => render_days(&store.week_grid(week_start_for(current)), today, locale),
        ViewMode::Day => {
            let timeline = store.day_timeline(current);
            let mut lines: Vec<String> = timeline.all_day.iter().map(|e| e.render(locale)).collect();
            for slot in timeline.hours.iter().filter(|s| !s.events.is_empty()) {
                lines.extend(slot.events.iter().map(|e| e.render(locale)));
            }
            if lines.is_empty() {
                "No events found".dimmed().to_string()
            } else {
                lines.join("\n")
            }
        }
        ViewMode::Agenda => render_days(&store.agenda(current, store.view_state().agenda_days), today, locale),
    };

    println!("{}", output);
    Ok(())
}
