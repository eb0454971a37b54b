pub mod care;
pub mod costs;
pub mod fixed_rates;
pub mod formula;
pub mod income;

pub use care::CareBand;
pub use fixed_rates::{AppliedRate, AssessmentOptions, FixedRate};
pub use formula::{
    calculate_assessment, calculate_assessment_with, AssessmentResult, ChildAssessment,
    CostOfChildrenSummary, PeriodicAmounts,
};
pub use income::{ParentAssessment, SelfSupportStatus};
