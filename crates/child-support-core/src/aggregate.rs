use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::AssessmentResult;
use crate::ftb::FtbImpact;
use crate::scoring::LeadScore;

/// The complete answer for one enquiry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    assessment: AssessmentResult,
    ftb_impact: FtbImpact,
    lead_score: LeadScore,
    computed_at: DateTime<Utc>,
    version: String,
}

pub fn aggregate(
    assessment: AssessmentResult,
    ftb_impact: FtbImpact,
    lead_score: LeadScore,
    computed_at: DateTime<Utc>,
    version: impl Into<String>,
) -> EstimateResponse {
    EstimateResponse {
        assessment,
        ftb_impact,
        lead_score,
        computed_at,
        version: version.into(),
    }
}

impl EstimateResponse {
    pub fn assessment(&self) -> &AssessmentResult {
        &self.assessment
    }

    pub fn ftb_impact(&self) -> &FtbImpact {
        &self.ftb_impact
    }

    pub fn lead_score(&self) -> &LeadScore {
        &self.lead_score
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
