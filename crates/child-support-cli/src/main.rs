mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::assess::{AssessArgs, FtbArgs};
use commands::estimate::{EstimateArgs, NormalizeArgs, ScoreArgs};
use commands::rates::{CheckConfigArgs, RatesArgs};

/// Australian child support estimates
#[derive(Parser)]
#[command(
    name = "csa",
    version,
    about = "Australian child support estimates",
    long_about = "Estimates child support under the basic formula with decimal precision, \
                  the resulting change to Family Tax Benefit Part A, and a lead priority \
                  score for follow-up."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (JSON or YAML); built-in tables and rules if omitted
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Full estimate: assessment, FTB impact and lead score
    Estimate(EstimateArgs),
    /// Child support assessment only
    Assess(AssessArgs),
    /// FTB Part A impact of the assessed child support
    Ftb(FtbArgs),
    /// Lead score only
    Score(ScoreArgs),
    /// Validate and print the normalized enquiry
    Normalize(NormalizeArgs),
    /// List configured financial years or show one rate table
    Rates(RatesArgs),
    /// Validate an engine configuration file
    CheckConfig(CheckConfigArgs),
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

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let config = || input::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Estimate(args) => commands::estimate::run_estimate(args, &config()?),
        Commands::Assess(args) => commands::assess::run_assess(args, &config()?),
        Commands::Ftb(args) => commands::assess::run_ftb(args, &config()?),
        Commands::Score(args) => commands::estimate::run_score(args, &config()?),
        Commands::Normalize(args) => commands::estimate::run_normalize(args, &config()?),
        Commands::Rates(args) => commands::rates::run_rates(args, &config()?),
        Commands::CheckConfig(args) => commands::rates::run_check_config(args),
        Commands::Version => Ok(serde_json::json!({
            "name": "csa",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let format = cli.output.clone();
    match run(cli) {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
