use anyhow::Result;
use owo_colors::OwoColorize;

use crate::context::Context;

pub fn run(ctx: &mut Context, id: &str) -> Result<()> {
    let title = ctx.store.get_event(id).map(|e| e.title.clone());

    if !ctx.store.delete_event(id) {
        println!("{}", format!("No event with id {}", id).dimmed());
        return Ok(());
    }

    ctx.save()?;
    println!("{}", format!("  Deleted: {}", title.unwrap_or_default()).red());
    Ok(())
}
