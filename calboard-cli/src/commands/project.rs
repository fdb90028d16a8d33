use anyhow::Result;
use calboard_core::EventStatus;
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::Render;

pub fn run(ctx: &Context, project_id: &str) -> Result<()> {
    let store = &ctx.store;
    let events = store.events_for_project(project_id);

    if events.is_empty() {
        println!("{}", format!("No events for project {}", project_id).dimmed());
        return Ok(());
    }

    println!("{}", format!("Project {}", project_id).bold());
    for event in &events {
        let date = store.locale().local_date(event.start_time);
        println!("  {}{}", date.format("%Y-%m-%d").dimmed(), event.render(store.locale()));
    }

    let total: f64 = events
        .iter()
        .filter(|e| e.status != EventStatus::Cancelled)
        .map(|e| e.amount)
        .sum();

    println!();
    println!("  {} events, {} total", events.len(), store.format_currency(total).bold());
    Ok(())
}
