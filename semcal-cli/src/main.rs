mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use semcal_core::ViewMode;
use semcal_core::config::SemcalConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "semcal")]
#[command(about = "Lay out Semisto calendar events as month and week grids")]
struct Cli {
    /// Events file (.json or .ics) or directory of .ics files, instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct GridArgs {
    /// Date to show (YYYY-MM-DD; month view also accepts YYYY-MM). Defaults to today
    #[arg(short, long)]
    date: Option<String>,

    /// Only show events of this type (repeatable)
    #[arg(short = 't', long = "type")]
    types: Vec<String>,

    /// Show the details of this event below the grid
    #[arg(short, long)]
    select: Option<String>,

    /// Print the grid as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Month grid (6 weeks, Monday first)
    Month {
        #[command(flatten)]
        args: GridArgs,
    },
    /// Week grid (Monday to Sunday)
    Week {
        #[command(flatten)]
        args: GridArgs,
    },
    /// Details of one event
    Show { id: String },
    /// Show the configuration file and its effective values
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // An explicit --file needs no config bootstrap
    let config = SemcalConfig::load_at(&SemcalConfig::config_path()?, cli.file.is_none())?;
    let events_path = cli.file.clone().unwrap_or_else(|| config.events_path());

    match cli.command {
        Some(Commands::Month { args }) => run_grid(&config, &events_path, ViewMode::Month, args),
        Some(Commands::Week { args }) => run_grid(&config, &events_path, ViewMode::Week, args),
        Some(Commands::Show { id }) => {
            let agenda = commands::load_agenda(&events_path)?;
            commands::show::run(&agenda, &id)
        }
        Some(Commands::Config) => commands::config::run(&config, &events_path),
        None => run_grid(&config, &events_path, config.default_view, GridArgs::default()),
    }
}

fn run_grid(
    config: &SemcalConfig,
    events_path: &std::path::Path,
    mode: ViewMode,
    args: GridArgs,
) -> Result<()> {
    debug!(events_path = %events_path.display(), %mode, "rendering grid");
    let agenda = commands::load_agenda(events_path)?;
    let options = commands::grid::GridOptions {
        mode,
        date: args.date,
        types: args.types,
        select: args.select,
        json: args.json,
    };
    commands::grid::run(config, &agenda, options)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
