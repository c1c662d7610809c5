mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::calculator::{ExemptArgs, SimplifiedArgs};
use commands::exchange_rate::ExchangeRateArgs;
use commands::tracking::TrackArgs;
use config::Config;

/// Import cost and profitability calculations
#[derive(Parser)]
#[command(
    name = "izimport",
    version,
    about = "Import cost and profitability calculations",
    long_about = "A CLI for estimating the landed cost of an import with decimal precision. \
                  Supports the duty-exempt and simplified customs regimes, the latest \
                  USD exchange rate, and shipment tracking lookups."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Landed cost for a duty-exempt (de-minimis) import
    Exempt(ExemptArgs),
    /// Landed cost under the simplified customs regime
    Simplified(SimplifiedArgs),
    /// Latest local-currency rate per USD
    ExchangeRate(ExchangeRateArgs),
    /// Look up a shipment by tracking number
    Track(TrackArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Exempt(args) => commands::calculator::run_exempt(args, &config),
        Commands::Simplified(args) => commands::calculator::run_simplified(args, &config),
        Commands::ExchangeRate(args) => commands::exchange_rate::run_exchange_rate(args, &config),
        Commands::Track(args) => commands::tracking::run_track(args, &config),
        Commands::Version => {
            println!("izimport {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
