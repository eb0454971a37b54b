use clap::Args;
use serde_json::{json, Value};

use child_support_core::config::EngineConfig;
use child_support_core::types::FinancialYear;

use crate::input;

/// Arguments for showing rate tables
#[derive(Args)]
pub struct RatesArgs {
    /// Show the full table for this financial year instead of the list
    #[arg(long)]
    pub financial_year: Option<String>,
}

/// Arguments for checking a configuration file
#[derive(Args)]
pub struct CheckConfigArgs {
    /// Path to a JSON or YAML engine configuration
    pub path: String,
}

pub fn run_rates(args: RatesArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    match args.financial_year {
        Some(year) => {
            let year: FinancialYear = year.parse()?;
            let table = config.rate_tables.get(&year)?;
            Ok(serde_json::to_value(table)?)
        }
        None => {
            let years: Vec<String> = config.rate_tables.years().map(|y| y.to_string()).collect();
            let latest = config
                .rate_tables
                .latest()
                .map(|t| t.financial_year.to_string());
            Ok(json!({
                "financial_years": years,
                "latest": latest,
                "config_version": config.version,
            }))
        }
    }
}

pub fn run_check_config(args: CheckConfigArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = input::load_config(Some(&args.path))?;
    let years: Vec<String> = config.rate_tables.years().map(|y| y.to_string()).collect();
    Ok(json!({
        "valid": true,
        "version": config.version,
        "computation_version": config.computation_version(),
        "financial_years": years,
        "rules": config.scoring.rules.len(),
        "tiers": config.scoring.tiers.len(),
    }))
}
