mod commands;
mod context;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::FilterArgs;
use context::Context;

/// Environment variable holding the log filter, e.g. `CALBOARD_LOG=calboard_core=debug`.
const LOG_ENV: &str = "CALBOARD_LOG";

#[derive(Parser)]
#[command(name = "calboard")]
#[command(about = "View, filter and export your engineering calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events for a month, week, day or agenda page
    Events {
        /// month, week, day or agenda (defaults to the configured view)
        #[arg(short, long)]
        view: Option<String>,

        /// Date to show the view around (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a month grid with event counts per day
    Grid {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show every event of a project, ignoring filters
    Project { id: String },
    /// Create an event (prompts for anything missing)
    New {
        title: Option<String>,

        /// Start date/time (e.g., "tomorrow 3pm", "sep 20")
        #[arg(short, long)]
        start: Option<String>,

        /// End date/time (e.g., "5pm", "friday")
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration (e.g., "30m", "2h", "3days")
        #[arg(short, long)]
        duration: Option<String>,

        /// Event type (job, milestone, visit, invoice, call, payout, ...)
        #[arg(short = 't', long = "type")]
        event_type: Option<String>,

        /// Initial status (defaults to draft)
        #[arg(long)]
        status: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        client: Option<String>,

        #[arg(short, long)]
        project: Option<String>,

        #[arg(long)]
        amount: Option<f64>,
    },
    /// Delete an event by id
    Delete { id: String },
    /// Write the visible events to an .ics file
    Export {
        /// Output file (defaults to <export_dir>/<calendar_name>-<date>.ics)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show config paths and values
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Events { view, date, filters } => {
            let mut ctx = Context::load()?;
            commands::events::run(&mut ctx, view.as_deref(), date.as_deref(), &filters)
        }
        Commands::Grid { month, filters } => {
            let mut ctx = Context::load()?;
            commands::grid::run(&mut ctx, month.as_deref(), &filters)
        }
        Commands::Project { id } => {
            let ctx = Context::load()?;
            commands::project::run(&ctx, &id)
        }
        Commands::New {
            title,
            start,
            end,
            duration,
            event_type,
            status,
            location,
            client,
            project,
            amount,
        } => {
            let mut ctx = Context::load()?;
            ctx.require_events_file()?;
            commands::new::run(
                &mut ctx,
                commands::new::NewArgs {
                    title,
                    start,
                    end,
                    duration,
                    event_type,
                    status,
                    location,
                    client,
                    project,
                    amount,
                },
            )
        }
        Commands::Delete { id } => {
            let mut ctx = Context::load()?;
            ctx.require_events_file()?;
            commands::delete::run(&mut ctx, &id)
        }
        Commands::Export { output, filters } => {
            let mut ctx = Context::load()?;
            commands::export::run(&mut ctx, output, &filters)
        }
        Commands::Config => commands::config::run(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
