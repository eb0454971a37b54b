use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::aggregate::{aggregate, EstimateResponse};
use crate::assessment::calculate_assessment_with;
use crate::config::EngineConfig;
use crate::ftb::calculate_ftb_impact;
use crate::input::{normalize_as_of, AssessmentInput};
use crate::scoring::score_lead;
use crate::ChildSupportResult;

/// Runs the whole pipeline on raw form input: normalize, assess, FTB impact,
/// score, aggregate.
///
/// `computed_at` is stamped on the response and also fixes "today" for
/// defaulting the financial year and for court date rules, so the same
/// input, configuration and timestamp always give the same response.
pub fn estimate(
    raw: &Value,
    config: &EngineConfig,
    computed_at: DateTime<Utc>,
) -> ChildSupportResult<EstimateResponse> {
    let input = normalize_as_of(raw, &config.rate_tables, computed_at.date_naive())?;
    estimate_normalized(&input, config, computed_at)
}

/// As [`estimate`], for input that is already normalized.
pub fn estimate_normalized(
    input: &AssessmentInput,
    config: &EngineConfig,
    computed_at: DateTime<Utc>,
) -> ChildSupportResult<EstimateResponse> {
    let assessment = calculate_assessment_with(input, &config.rate_tables, &config.assessment)?;
    let ftb = calculate_ftb_impact(input, &assessment, &config.rate_tables)?;
    let lead = score_lead(
        input,
        &assessment,
        &ftb,
        &config.scoring,
        computed_at.date_naive(),
    );
    debug!(score = lead.score, tier = %lead.tier, "lead scored");

    Ok(aggregate(
        assessment,
        ftb,
        lead,
        computed_at,
        config.computation_version(),
    ))
}
