use std::path::PathBuf;

use anyhow::{Context as _, Result};
use calboard_core::ics::export_file_name;
use owo_colors::OwoColorize;

use super::FilterArgs;
use crate::context::Context;

pub fn run(ctx: &mut Context, output: Option<PathBuf>, filters: &FilterArgs) -> Result<()> {
    filters.apply(&mut ctx.store)?;

    let count = ctx.store.visible_events().len();
    let ics = ctx.store.export_ics().context("Failed to export events")?;

    let path = match output {
        Some(path) => path,
        None => ctx
            .config
            .export_path()
            .join(export_file_name(&ctx.config.calendar_name, ctx.store.today())),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(&path, ics).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{}",
        format!("  Exported {} events to {}", count, path.display()).green()
    );
    Ok(())
}
