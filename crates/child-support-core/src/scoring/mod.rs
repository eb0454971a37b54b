pub mod defaults;
pub mod engine;
pub mod metrics;
pub mod rules;

pub use engine::{score_lead, LeadScore, LeadTier, RuleFailure, ScoringConfig, TierBand};
pub use metrics::{MetricValue, ScoringContext};
pub use rules::{CompareOp, Predicate, ScoringRule};
