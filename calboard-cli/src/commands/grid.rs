use anyhow::{Context as _, Result};
use calboard_core::ViewMode;
use calboard_core::date_range::parse_date;
use owo_colors::OwoColorize;

use super::FilterArgs;
use crate::context::Context;
use crate::render::render_month_grid;

pub fn run(ctx: &mut Context, month: Option<&str>, filters: &FilterArgs) -> Result<()> {
    let store = &mut ctx.store;
    store.set_view(ViewMode::Month);

    if let Some(month) = month {
        let first = parse_date(&format!("{month}-01"))
            .with_context(|| format!("Invalid month '{month}'. Expected YYYY-MM"))?;
        store.set_current_date(first);
    }
    filters.apply(store)?;

    let (year, month) = store.current_month();
    let cells = store.month_grid(year, month)?;
    let total: usize = cells.iter().filter(|c| c.in_current_month).map(|c| c.events.len()).sum();

    println!("{}", store.period_label().bold());
    println!("{}", render_month_grid(&cells));
    println!();
    println!("{}", format!("{} events this month", total).dimmed());

    Ok(())
}
