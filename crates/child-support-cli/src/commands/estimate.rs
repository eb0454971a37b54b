use clap::Args;
use serde_json::Value;

use child_support_core::config::EngineConfig;
use child_support_core::estimate::estimate;
use child_support_core::input::normalize_as_of;

use super::enquiry::EnquiryArgs;

/// Arguments for a full estimate
#[derive(Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub enquiry: EnquiryArgs,
}

/// Arguments for lead scoring
#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub enquiry: EnquiryArgs,
}

/// Arguments for input normalization
#[derive(Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub enquiry: EnquiryArgs,
}

pub fn run_estimate(
    args: EstimateArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.enquiry.raw()?;
    let response = estimate(&raw, config, args.enquiry.computed_at())?;
    Ok(serde_json::to_value(response)?)
}

pub fn run_score(args: ScoreArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.enquiry.raw()?;
    let response = estimate(&raw, config, args.enquiry.computed_at())?;
    Ok(serde_json::to_value(response.lead_score())?)
}

pub fn run_normalize(
    args: NormalizeArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.enquiry.raw()?;
    let as_of = args.enquiry.computed_at().date_naive();
    let input = normalize_as_of(&raw, &config.rate_tables, as_of)?;
    Ok(serde_json::to_value(input)?)
}
