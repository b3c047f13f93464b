//! Streaming Stats - Main entry point
//!
//! Loads the exported history from the data directory and prints rankings,
//! a listening heatmap, or a CSV export for the selected years.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use streaming_stats::analytics::Report;
use streaming_stats::display::{self, ListOrder};
use streaming_stats::export;
use streaming_stats::filter::{TimeBasis, YearSelection};
use streaming_stats::history::load_history;
use streaming_stats::{Config, Error, History};

#[derive(Parser)]
#[command(name = "streaming-stats")]
#[command(author, version, about = "Explore your exported streaming history")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the exported JSON files
    #[arg(short, long, global = true, env = "STREAMING_STATS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Derive years, hours and weekdays in the local time zone
    #[arg(long, global = true)]
    local_time: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Clone, Default)]
struct Selection {
    /// Year to include (repeatable; default: every year in the history)
    #[arg(short, long = "year")]
    years: Vec<i32>,

    /// Number of items to show in top lists
    #[arg(short, long)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show top artists, top tracks and the listening heatmap
    Stats {
        #[command(flatten)]
        selection: Selection,

        /// List rankings smallest first
        #[arg(long)]
        ascending: bool,

        /// Skip the heatmap
        #[arg(long)]
        no_heatmap: bool,

        /// Print a summary of the filtered data
        #[arg(long)]
        debug_info: bool,
    },

    /// List the years present in the history
    Years,

    /// Export top tracks as CSV
    Export {
        #[command(flatten)]
        selection: Selection,

        /// Output file (default: config export path, or top_tracks.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(load_error) = e.downcast_ref::<Error>().filter(|e| e.is_fatal_load()) {
                eprintln!("Error: {load_error}");
                eprintln!("Place your exported streaming history (*.json) in the data directory.");
                return ExitCode::from(2);
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?
    } else {
        Config::load()?
    };
    if let Some(dir) = cli.data_dir {
        config.general.data_dir = dir;
    }
    if cli.local_time {
        config.analytics.time_basis = TimeBasis::Local;
    }
    config.validate()?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.general.log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Some(Commands::Stats {
            selection,
            ascending,
            no_heatmap,
            debug_info,
        }) => {
            let order = if ascending {
                ListOrder::Ascending
            } else {
                ListOrder::Descending
            };
            run_stats(&config, &selection, order, !no_heatmap, debug_info)
        }

        Some(Commands::Years) => {
            let history = load(&config)?;
            for year in history.log.years(config.analytics.time_basis) {
                println!("{year}");
            }
            Ok(())
        }

        Some(Commands::Export { selection, output }) => {
            let history = load(&config)?;
            let report = build_report(&config, &history, &selection);
            let path = output
                .or_else(|| config.export.default_path.clone())
                .unwrap_or_else(|| PathBuf::from("top_tracks.csv"));
            export::export_ranked_tracks(&path, &report.top_tracks)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} tracks to {}", report.top_tracks.len(), path.display());
            Ok(())
        }

        Some(Commands::Config { show, init }) => {
            if init {
                let default_config = Config::default();
                default_config.save()?;
                println!(
                    "Created default configuration at {}",
                    Config::config_path()?.display()
                );
            } else if show {
                let contents = toml::to_string_pretty(&config)?;
                println!("{contents}");
            } else {
                println!("Configuration path: {}", Config::config_path()?.display());
            }
            Ok(())
        }

        None => run_stats(&config, &Selection::default(), ListOrder::Descending, true, false),
    }
}

// One load per invocation, so the binary reads the directory directly.
fn load(config: &Config) -> anyhow::Result<History> {
    Ok(load_history(config.data_dir())?)
}

fn build_report(config: &Config, history: &History, selection: &Selection) -> Report {
    let basis = config.analytics.time_basis;
    let years = if selection.years.is_empty() {
        YearSelection::all(&history.log, basis)
    } else {
        selection.years.iter().copied().collect()
    };
    let limit = selection.limit.unwrap_or(config.analytics.default_limit);

    Report::compute(&history.log, years, limit, basis)
}

fn run_stats(
    config: &Config,
    selection: &Selection,
    order: ListOrder,
    show_heatmap: bool,
    debug_info: bool,
) -> anyhow::Result<()> {
    let history = load(config)?;
    let report = build_report(config, &history, selection);

    display::print_section(&format!("STREAMING HISTORY - {}", report.years));

    if !history.warnings.is_empty() {
        display::print_section_simple(&format!("WARNINGS ({})", history.warnings.len()));
        display::display_warnings(&history.warnings);
    }

    if report.is_empty() {
        println!("\nNo listening data for this selection.");
        return Ok(());
    }

    display::print_section_simple("OVERVIEW");
    display::display_overview(&report.overview);

    display::print_section_simple(&format!(
        "TOP {} ARTISTS (of {})",
        report.top_artists.len(),
        report.top_artists.distinct_total()
    ));
    display::display_top_artists(&report.top_artists, order, true);

    display::print_section_simple(&format!("TOP {} TRACKS", report.top_tracks.len()));
    display::display_top_tracks(&report.top_tracks, order, true);

    if show_heatmap {
        display::print_section_simple("LISTENING BY DAY AND HOUR");
        display::display_heatmap(&report.heatmap);
    }

    if debug_info {
        display::print_section_simple("DATA DEBUG INFO");
        display::display_debug_info(&report.overview, &report.filtered);
    }

    println!("\n{}\n", "=".repeat(50));

    Ok(())
}
