//! # Planner CLI
//!
//! Usage:
//!   planner -o planner.pdf
//!   planner --config planner.json --year 2025 --years 2
//!   planner --example > planner.json
//!   planner --dry-run -v

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use planner::canvas::{Canvas, RecordingCanvas};
use planner::config::PlannerConfig;
use planner::PlannerError;

#[derive(Debug, Parser)]
#[command(name = "planner", version, about = "Generate a linked PDF planner")]
struct Cli {
    /// JSON configuration file; command line flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First year of the planner.
    #[arg(long)]
    year: Option<i32>,

    /// Number of years to include.
    #[arg(long)]
    years: Option<u32>,

    /// Output PDF path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Put navigation on the left and notes on the right.
    #[arg(long)]
    left_handed: bool,

    #[arg(long)]
    landscape: bool,

    /// 0 = Sunday through 6 = Saturday.
    #[arg(long)]
    first_day_of_week: Option<u8>,

    /// Build everything but write no file; report what would be written.
    #[arg(long)]
    dry_run: bool,

    /// Print the default configuration as JSON and exit.
    #[arg(long)]
    example: bool,

    /// More logging (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.example {
        match serde_json::to_string_pretty(&PlannerConfig::default()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("✗ {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), PlannerError> {
    let config = load_config(cli)?;
    config.validate()?;

    if cli.dry_run {
        let mut canvas = RecordingCanvas::new();
        planner::build_planner(&config, &mut canvas)?;
        eprintln!(
            "✓ Would write {} pages with {} links to {}",
            canvas.page_count(),
            canvas.link_count(),
            config.filename.display()
        );
        return Ok(());
    }

    let summary = planner::generate(&config)?;
    eprintln!(
        "✓ Written {} pages with {} links to {}",
        summary.pages,
        summary.links,
        config.filename.display()
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<PlannerConfig, PlannerError> {
    let mut config = match &cli.config {
        Some(path) => PlannerConfig::from_file(path)?,
        None => PlannerConfig::default(),
    };

    if let Some(year) = cli.year {
        config.base_year = year;
    }
    if let Some(years) = cli.years {
        config.num_years = years;
    }
    if let Some(output) = &cli.output {
        config.filename = output.clone();
    }
    if let Some(day) = cli.first_day_of_week {
        config.first_day_of_week = day;
    }
    if cli.left_handed {
        config.left_handed = true;
    }
    if cli.landscape {
        config.portrait = false;
    }
    Ok(config)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
