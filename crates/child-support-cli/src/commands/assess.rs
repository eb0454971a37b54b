use clap::Args;
use serde_json::Value;

use child_support_core::assessment::calculate_assessment_with;
use child_support_core::config::EngineConfig;
use child_support_core::ftb::calculate_ftb_impact;
use child_support_core::input::{normalize_as_of, AssessmentInput};

use super::enquiry::EnquiryArgs;

/// Arguments for the child support assessment alone
#[derive(Args)]
pub struct AssessArgs {
    #[command(flatten)]
    pub enquiry: EnquiryArgs,
}

/// Arguments for the FTB Part A impact
#[derive(Args)]
pub struct FtbArgs {
    #[command(flatten)]
    pub enquiry: EnquiryArgs,
}

fn normalized(
    enquiry: &EnquiryArgs,
    config: &EngineConfig,
) -> Result<AssessmentInput, Box<dyn std::error::Error>> {
    let raw = enquiry.raw()?;
    let as_of = enquiry.computed_at().date_naive();
    Ok(normalize_as_of(&raw, &config.rate_tables, as_of)?)
}

pub fn run_assess(args: AssessArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let input = normalized(&args.enquiry, config)?;
    let result = calculate_assessment_with(&input, &config.rate_tables, &config.assessment)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_ftb(args: FtbArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let input = normalized(&args.enquiry, config)?;
    let assessment = calculate_assessment_with(&input, &config.rate_tables, &config.assessment)?;
    let impact = calculate_ftb_impact(&input, &assessment, &config.rate_tables)?;
    Ok(serde_json::to_value(impact)?)
}
