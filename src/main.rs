mod commands;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use tcxroute::export::ChartSeries;
use tcxroute::{ExtractOptions, PositionPolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tcxroute", about = "Extract routes and metrics from TCX activity files")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct InputArgs {
    /// TCX file to read; reads stdin when omitted
    file: Option<PathBuf>,

    /// Keep trackpoints that have a time but no position
    #[arg(long)]
    keep_unpositioned: bool,
}

impl InputArgs {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            position_policy: if self.keep_unpositioned {
                PositionPolicy::KeepUnpositioned
            } else {
                PositionPolicy::RequirePosition
            },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Series {
    HrElevation,
    Position,
}

impl From<Series> for ChartSeries {
    fn from(series: Series) -> Self {
        match series {
            Series::HrElevation => ChartSeries::HeartRateElevation,
            Series::Position => ChartSeries::Position,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the full processing result as JSON")]
    Process {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    #[command(about = "Print the route as a GeoJSON FeatureCollection")]
    Map {
        #[command(flatten)]
        input: InputArgs,
    },
    #[command(about = "Print a time series of the samples as CSV")]
    Chart {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = Series::HrElevation)]
        series: Series,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "tcxroute=warn",
        1 => "tcxroute=info",
        _ => "tcxroute=debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Process { input, pretty } => {
            commands::process::process_command(input.file.as_deref(), &input.options(), pretty)
        }
        Commands::Map { input } => {
            commands::map::map_command(input.file.as_deref(), &input.options())
        }
        Commands::Chart { input, series } => {
            commands::chart::chart_command(input.file.as_deref(), &input.options(), series.into())
        }
    }
}
