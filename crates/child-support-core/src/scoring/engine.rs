use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults;
use super::metrics::ScoringContext;
use super::rules::ScoringRule;
use crate::assessment::AssessmentResult;
use crate::error::ChildSupportError;
use crate::ftb::FtbImpact;
use crate::input::AssessmentInput;
use crate::ChildSupportResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTier {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for LeadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeadTier::Low => "low",
            LeadTier::Medium => "medium",
            LeadTier::High => "high",
            LeadTier::Urgent => "urgent",
        };
        f.write_str(name)
    }
}

/// Scores in `[min, max)` map to `tier`. No `max` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub tier: LeadTier,
    pub min: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl TierBand {
    fn contains(&self, score: i32) -> bool {
        score >= self.min && self.max.map_or(true, |max| score < max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub rules: Vec<ScoringRule>,
    pub tiers: Vec<TierBand>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            rules: defaults::default_rules(),
            tiers: defaults::default_tiers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadScore {
    pub score: i32,
    pub tier: LeadTier,
    /// Satisfied rule ids in configuration order.
    pub satisfied_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_errors: Vec<RuleFailure>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl ScoringConfig {
    pub fn validate(&self) -> ChildSupportResult<()> {
        let mut seen = HashSet::new();
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.id.trim().is_empty() {
                return Err(ChildSupportError::invalid_config(
                    format!("scoring.rules[{i}].id"),
                    "rule id must not be empty",
                ));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(ChildSupportError::invalid_config(
                    format!("scoring.rules[{i}].id"),
                    format!("duplicate rule id '{}'", rule.id),
                ));
            }
            rule.predicate.check().map_err(|e| {
                ChildSupportError::invalid_config(format!("scoring.rules[{i}].predicate"), e.to_string())
            })?;
        }

        if self.tiers.is_empty() {
            return Err(ChildSupportError::invalid_config(
                "scoring.tiers",
                "at least one tier is required",
            ));
        }
        for (i, band) in self.tiers.iter().enumerate() {
            if band.max.is_some_and(|max| max <= band.min) {
                return Err(ChildSupportError::invalid_config(
                    format!("scoring.tiers[{i}]"),
                    "max must be greater than min",
                ));
            }
        }
        for (i, pair) in self.tiers.windows(2).enumerate() {
            let ordered = pair[0].max.is_some_and(|max| max <= pair[1].min);
            if !ordered {
                return Err(ChildSupportError::invalid_config(
                    format!("scoring.tiers[{}]", i + 1),
                    "tiers must be ascending and must not overlap",
                ));
            }
        }
        Ok(())
    }

    /// Tier for a score. Scores outside every band fail closed to `Low`.
    pub fn tier_for(&self, score: i32) -> LeadTier {
        self.tiers
            .iter()
            .find(|band| band.contains(score))
            .map(|band| band.tier)
            .unwrap_or(LeadTier::Low)
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Scores a lead. A rule that fails to evaluate counts as not satisfied; the
/// failure is logged and listed in `rule_errors` but never aborts scoring.
pub fn score_lead(
    input: &AssessmentInput,
    assessment: &AssessmentResult,
    ftb: &FtbImpact,
    config: &ScoringConfig,
    as_of: NaiveDate,
) -> LeadScore {
    let ctx = ScoringContext {
        input,
        assessment,
        ftb,
        as_of,
    };

    let mut score = 0i32;
    let mut satisfied_rules = Vec::new();
    let mut rule_errors = Vec::new();

    for rule in &config.rules {
        match rule.matches(&ctx) {
            Ok(0) => {}
            Ok(matches) => {
                score = score.saturating_add(rule.points(matches));
                satisfied_rules.push(rule.id.clone());
            }
            Err(e) => {
                warn!(rule = %rule.id, error = %e, "scoring rule failed, treating as not satisfied");
                rule_errors.push(RuleFailure {
                    rule_id: rule.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    LeadScore {
        score,
        tier: config.tier_for(score),
        satisfied_rules,
        rule_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::calculate_assessment;
    use crate::ftb::calculate_ftb_impact;
    use crate::input::{Child, LeadContext, Parent};
    use crate::rates::RateTableRegistry;
    use crate::scoring::rules::{CompareOp, Predicate};
    use crate::types::FinancialYear;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        input: AssessmentInput,
        assessment: AssessmentResult,
        ftb: FtbImpact,
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn fixture(income_a: Decimal, care_a: Decimal, lead: LeadContext) -> Fixture {
        let input = AssessmentInput {
            financial_year: FinancialYear::starting(2025),
            parents: [
                Parent { income: income_a, ..Default::default() },
                Parent { income: dec!(40000), ..Default::default() },
            ],
            children: vec![Child { age: 8, care: [care_a, Decimal::ONE_HUNDRED - care_a] }],
            lead,
        };
        let registry = RateTableRegistry::builtin();
        let assessment = calculate_assessment(&input, &registry).unwrap();
        let ftb = calculate_ftb_impact(&input, &assessment, &registry).unwrap();
        Fixture { input, assessment, ftb }
    }

    fn score(f: &Fixture, config: &ScoringConfig) -> LeadScore {
        score_lead(&f.input, &f.assessment, &f.ftb, config, as_of())
    }

    fn rule(id: &str, weight: i32, predicate: Predicate) -> ScoringRule {
        ScoringRule {
            id: id.into(),
            weight,
            description: String::new(),
            predicate,
            per_match: false,
        }
    }

    #[test]
    fn test_default_rules_plain_enquiry_scores_zero() {
        let f = fixture(dec!(80000), dec!(0), LeadContext::default());
        let result = score(&f, &ScoringConfig::default());
        assert_eq!(
            result,
            LeadScore {
                score: 0,
                tier: LeadTier::Low,
                satisfied_rules: vec![],
                rule_errors: vec![],
            }
        );
    }

    #[test]
    fn test_default_rules_sum_satisfied_weights() {
        let lead = LeadContext {
            special_circumstances: vec![
                "property_settlement_pending".into(),
                "international_jurisdiction".into(),
                "other".into(),
            ],
            financial_tags: vec!["Cash Business".into()],
            court_date: NaiveDate::from_ymd_opt(2025, 10, 20),
            binding_agreement: true,
        };
        // 120k payer at shared care
        let f = fixture(dec!(120000), dec!(40), lead);
        let result = score(&f, &ScoringConfig::default());

        let expected = vec![
            "court_date_urgent",
            "international_jurisdiction",
            "property_settlement",
            "income_issues",
            "multiple_complexity",
            "special_circumstance",
            "shared_care_dispute",
            "binding_agreement",
        ];
        assert_eq!(result.satisfied_rules, expected);
        assert_eq!(result.score, 10 + 8 + 8 + 7 + 5 + 4 + 6 + 2);
        assert_eq!(result.tier, LeadTier::Urgent);
    }

    fn circumstances(names: &[&str]) -> LeadContext {
        LeadContext {
            special_circumstances: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_each_other_circumstance_scores() {
        let f = fixture(dec!(80000), dec!(0), circumstances(&["a", "b"]));
        let result = score(&f, &ScoringConfig::default());
        assert_eq!(result.satisfied_rules, vec!["special_circumstance"]);
        assert_eq!(result.score, 8);
        assert_eq!(result.tier, LeadTier::High);

        let f = fixture(dec!(80000), dec!(0), circumstances(&["a", "b", "c"]));
        let result = score(&f, &ScoringConfig::default());
        assert_eq!(
            result.satisfied_rules,
            vec!["multiple_complexity", "special_circumstance"]
        );
        assert_eq!(result.score, 5 + 3 * 4);
        assert_eq!(result.tier, LeadTier::Urgent);
    }

    #[test]
    fn test_named_circumstances_are_not_counted_again() {
        let f = fixture(
            dec!(80000),
            dec!(0),
            circumstances(&["post_separation_income", "other"]),
        );
        let result = score(&f, &ScoringConfig::default());
        assert_eq!(
            result.satisfied_rules,
            vec!["post_separation_income", "special_circumstance"]
        );
        assert_eq!(result.score, 5 + 4);
    }

    #[test]
    fn test_count_rule_below_minimum_scores_nothing() {
        let f = fixture(dec!(80000), dec!(0), circumstances(&["a"]));
        let config = ScoringConfig {
            rules: vec![ScoringRule {
                per_match: true,
                ..rule("pairs", 3, Predicate::CountAtLeast {
                    metric: "special_circumstances".into(),
                    min: 2,
                    exclude: Vec::new(),
                })
            }],
            tiers: defaults::default_tiers(),
        };
        let result = score(&f, &config);
        assert_eq!(result.score, 0);
        assert!(result.satisfied_rules.is_empty());
    }

    #[test]
    fn test_court_date_windows() {
        let cases = [
            (0, vec![]),
            (1, vec!["court_date_urgent"]),
            (30, vec!["court_date_urgent"]),
            (31, vec!["court_date_future"]),
        ];
        for (days, expected) in cases {
            let lead = LeadContext {
                court_date: Some(as_of() + chrono::Duration::days(days)),
                ..Default::default()
            };
            let f = fixture(dec!(80000), dec!(0), lead);
            let result = score(&f, &ScoringConfig::default());
            assert_eq!(result.satisfied_rules, expected, "{days} days");
        }
    }

    #[test]
    fn test_high_value_threshold_is_exclusive() {
        let mut f = fixture(dec!(80000), dec!(0), LeadContext::default());
        f.assessment.annual_liability = dec!(15000);
        assert!(score(&f, &ScoringConfig::default()).satisfied_rules.is_empty());

        f.assessment.annual_liability = dec!(15000.01);
        let result = score(&f, &ScoringConfig::default());
        assert_eq!(result.satisfied_rules, vec!["high_value_case"]);
        assert_eq!(result.score, 6);
    }

    #[test]
    fn test_score_equals_weights_of_satisfied_rules() {
        let f = fixture(dec!(80000), dec!(0), LeadContext::default());
        let config = ScoringConfig {
            rules: vec![
                rule("big", 3, Predicate::Compare {
                    metric: "annual_liability".into(),
                    op: CompareOp::Gt,
                    value: dec!(8000),
                }),
                rule("payer", 2, Predicate::Flag { metric: "has_payer".into() }),
                rule("penalty", -1, Predicate::Compare {
                    metric: "child_count".into(),
                    op: CompareOp::Eq,
                    value: dec!(1),
                }),
                rule("never", 50, Predicate::Flag { metric: "multi_case_applied".into() }),
            ],
            tiers: defaults::default_tiers(),
        };
        let result = score(&f, &config);
        assert_eq!(result.satisfied_rules, vec!["big", "payer", "penalty"]);
        assert_eq!(result.score, 4);
        assert_eq!(result.tier, LeadTier::Medium);
    }

    #[test]
    fn test_failing_rule_is_not_satisfied() {
        let f = fixture(dec!(80000), dec!(0), LeadContext::default());
        let config = ScoringConfig {
            rules: vec![
                rule("unknown", 10, Predicate::Flag { metric: "vip".into() }),
                rule("mismatch", 10, Predicate::Flag { metric: "annual_liability".into() }),
                rule("ok", 2, Predicate::Flag { metric: "has_payer".into() }),
            ],
            tiers: defaults::default_tiers(),
        };
        let result = score(&f, &config);
        assert_eq!(result.score, 2);
        assert_eq!(result.satisfied_rules, vec!["ok"]);
        let failed: Vec<&str> = result.rule_errors.iter().map(|e| e.rule_id.as_str()).collect();
        assert_eq!(failed, vec!["unknown", "mismatch"]);
    }

    #[test]
    fn test_missing_court_date_does_not_satisfy() {
        let f = fixture(dec!(80000), dec!(0), LeadContext::default());
        let config = ScoringConfig {
            rules: vec![
                rule("soon", 10, Predicate::Between {
                    metric: "days_until_court".into(),
                    min: dec!(0),
                    max: dec!(30),
                }),
                rule("not_soon", 1, Predicate::Not {
                    of: Box::new(Predicate::Between {
                        metric: "days_until_court".into(),
                        min: dec!(0),
                        max: dec!(30),
                    }),
                }),
            ],
            tiers: defaults::default_tiers(),
        };
        let result = score(&f, &config);
        assert_eq!(result.satisfied_rules, vec!["not_soon"]);
        assert!(result.rule_errors.is_empty());
    }

    #[test]
    fn test_tier_boundaries() {
        let config = ScoringConfig::default();
        let cases = [
            (-3, LeadTier::Low),
            (0, LeadTier::Low),
            (1, LeadTier::Low),
            (2, LeadTier::Low),
            (3, LeadTier::Low),
            (4, LeadTier::Medium),
            (6, LeadTier::Medium),
            (7, LeadTier::High),
            (9, LeadTier::High),
            (10, LeadTier::Urgent),
            (55, LeadTier::Urgent),
        ];
        for (score, tier) in cases {
            assert_eq!(config.tier_for(score), tier, "score {score}");
        }
    }

    #[test]
    fn test_validate_rejects_overlapping_tiers() {
        let mut config = ScoringConfig::default();
        config.tiers[1].min = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_rule_ids() {
        let mut config = ScoringConfig::default();
        let first = config.rules[0].clone();
        config.rules.push(first);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate rule id"));
    }

    #[test]
    fn test_default_config_validates() {
        ScoringConfig::default().validate().unwrap();
    }
}
