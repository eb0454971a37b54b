//! Rule set and tiers the engine ships with. Deployments override both
//! through configuration.

use rust_decimal_macros::dec;

use super::engine::{LeadTier, TierBand};
use super::rules::{CompareOp, Predicate, ScoringRule};

pub const PROPERTY_SETTLEMENT: &str = "property_settlement_pending";
pub const INTERNATIONAL_JURISDICTION: &str = "international_jurisdiction";
pub const POST_SEPARATION_INCOME: &str = "post_separation_income";

fn rule(id: &str, weight: i32, description: &str, predicate: Predicate) -> ScoringRule {
    ScoringRule {
        id: id.to_string(),
        weight,
        description: description.to_string(),
        predicate,
        per_match: false,
    }
}

/// A rule scored once per counted entry.
fn counted(id: &str, weight: i32, description: &str, predicate: Predicate) -> ScoringRule {
    ScoringRule {
        per_match: true,
        ..rule(id, weight, description, predicate)
    }
}

fn has_circumstance(tag: &str) -> Predicate {
    Predicate::HasTag {
        metric: "special_circumstances".into(),
        tag: tag.into(),
    }
}

pub fn default_rules() -> Vec<ScoringRule> {
    vec![
        rule(
            "court_date_urgent",
            10,
            "Court date within the next 30 days",
            Predicate::Between {
                metric: "days_until_court".into(),
                min: dec!(1),
                max: dec!(30),
            },
        ),
        rule(
            "court_date_future",
            5,
            "Court date more than 30 days away",
            Predicate::Compare {
                metric: "days_until_court".into(),
                op: CompareOp::Gt,
                value: dec!(30),
            },
        ),
        rule(
            "international_jurisdiction",
            8,
            "Other parent overseas",
            has_circumstance(INTERNATIONAL_JURISDICTION),
        ),
        rule(
            "property_settlement",
            8,
            "Property settlement pending",
            has_circumstance(PROPERTY_SETTLEMENT),
        ),
        rule(
            "post_separation_income",
            5,
            "Income changed after separation",
            has_circumstance(POST_SEPARATION_INCOME),
        ),
        rule(
            "income_issues",
            7,
            "Hidden assets or cash business income",
            Predicate::HasAnyTag {
                metric: "financial_tags".into(),
                tags: vec!["Hidden Assets".into(), "Cash Business".into()],
            },
        ),
        rule(
            "high_value_case",
            6,
            "Annual liability above $15,000",
            Predicate::Compare {
                metric: "annual_liability".into(),
                op: CompareOp::Gt,
                value: dec!(15000),
            },
        ),
        rule(
            "multiple_complexity",
            5,
            "Three or more special circumstances",
            Predicate::CountAtLeast {
                metric: "special_circumstances".into(),
                min: 3,
                exclude: Vec::new(),
            },
        ),
        counted(
            "special_circumstance",
            4,
            "Each other special circumstance",
            Predicate::CountAtLeast {
                metric: "special_circumstances".into(),
                min: 1,
                exclude: vec![
                    PROPERTY_SETTLEMENT.into(),
                    INTERNATIONAL_JURISDICTION.into(),
                    POST_SEPARATION_INCOME.into(),
                ],
            },
        ),
        rule(
            "shared_care_dispute",
            6,
            "A child in shared care (35-65%)",
            Predicate::AnyChildCare {
                min: dec!(35),
                max: dec!(65),
            },
        ),
        rule(
            "binding_agreement",
            2,
            "Interested in a binding child support agreement",
            Predicate::Flag {
                metric: "binding_agreement".into(),
            },
        ),
        rule(
            "trivial_liability",
            -2,
            "Liability below the minimum annual rate",
            Predicate::All {
                of: vec![
                    Predicate::Flag {
                        metric: "has_payer".into(),
                    },
                    Predicate::Compare {
                        metric: "annual_liability".into(),
                        op: CompareOp::Lt,
                        value: dec!(534),
                    },
                ],
            },
        ),
    ]
}

pub fn default_tiers() -> Vec<TierBand> {
    vec![
        TierBand {
            tier: LeadTier::Low,
            min: 2,
            max: Some(4),
        },
        TierBand {
            tier: LeadTier::Medium,
            min: 4,
            max: Some(7),
        },
        TierBand {
            tier: LeadTier::High,
            min: 7,
            max: Some(10),
        },
        TierBand {
            tier: LeadTier::Urgent,
            min: 10,
            max: None,
        },
    ]
}
