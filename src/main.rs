use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use souqdash::temporal::parse_date;
use souqdash::{Dashboard, DashboardConfig, Dataset, Result, TableLoader};

/// Executive dashboard figures for orders, fulfillment and returns.
///
/// Reads customers, orders, order items, fulfillment and returns CSV files,
/// applies the filters below and prints the resulting KPIs.
#[derive(Parser, Debug)]
#[command(name = "souqdash", version)]
struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to search for the input files; repeat to search several
    #[arg(short, long = "data-dir")]
    data_dir: Vec<PathBuf>,

    /// First order date to include (YYYY-MM-DD); defaults to the earliest
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// Last order date to include (YYYY-MM-DD); defaults to the latest
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,

    /// Customer city to keep; repeat for several
    #[arg(long)]
    city: Vec<String>,

    /// Order channel to keep; repeat for several
    #[arg(long)]
    channel: Vec<String>,

    /// Customer segment to keep; repeat for several
    #[arg(long)]
    segment: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the available filter values instead of the figures
    #[arg(long)]
    list_options: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("souqdash: {}", err);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("souqdash: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then file, then environment, then command line
fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load_with_precedence(cli.config.as_ref())?;
    if !cli.data_dir.is_empty() {
        config.data.base_dirs = cli.data_dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, config: DashboardConfig) -> Result<()> {
    let loader = TableLoader::new(config.clone());
    let dataset = Arc::new(Dataset::load(&loader)?);
    let dashboard = Dashboard::new(dataset, config);

    if cli.list_options {
        let options = dashboard.options();
        match cli.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&options)?),
            Format::Text => {
                println!("Cities:   {}", options.cities.join(", "));
                println!("Channels: {}", options.channels.join(", "));
                println!("Segments: {}", options.segments.join(", "));
                if let (Some(min), Some(max)) = (options.min_date, options.max_date) {
                    println!("Dates:    {} to {}", min, max);
                }
            }
        }
        return Ok(());
    }

    let spec = dashboard.filter_spec(cli.start, cli.end, &cli.city, &cli.channel, &cli.segment)?;
    let summary = dashboard.summarize(&spec)?;

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        Format::Text => print!("{}", summary.render_text(&dashboard.config().display.currency)),
    }

    Ok(())
}
