use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::metrics::{ScoringContext, METRICS};
use crate::error::RuleEvaluationError;
use crate::types::Percent;

/// One weighted rule. Weights may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub id: String,
    pub weight: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub predicate: Predicate,
    /// Scores `weight` once per counted entry instead of once per rule.
    /// Only `count_at_least` counts more than one match.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub per_match: bool,
}

impl ScoringRule {
    /// How many times the rule is satisfied: zero or one, or the counted
    /// entries for a `per_match` rule.
    pub fn matches(&self, ctx: &ScoringContext<'_>) -> Result<usize, RuleEvaluationError> {
        if self.per_match {
            self.predicate.matches(ctx)
        } else {
            Ok(usize::from(self.predicate.evaluate(ctx)?))
        }
    }

    pub fn points(&self, matches: usize) -> i32 {
        let matches = i32::try_from(matches).unwrap_or(i32::MAX);
        self.weight.saturating_mul(matches)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

impl CompareOp {
    fn holds(self, left: Decimal, right: Decimal) -> bool {
        match self {
            CompareOp::Lt => left < right,
            CompareOp::Lte => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Gte => left >= right,
            CompareOp::Eq => left == right,
        }
    }
}

/// Boolean expression over named metrics.
///
/// A metric with no value (no court date, no payer) never satisfies a
/// comparison; `not` of such a comparison is therefore true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    Compare {
        metric: String,
        op: CompareOp,
        value: Decimal,
    },
    /// Inclusive on both ends.
    Between {
        metric: String,
        min: Decimal,
        max: Decimal,
    },
    Flag {
        metric: String,
    },
    /// Some assessed child has a parent whose care is within `min..=max`.
    AnyChildCare {
        min: Percent,
        max: Percent,
    },
    HasTag {
        metric: String,
        tag: String,
    },
    HasAnyTag {
        metric: String,
        tags: Vec<String>,
    },
    /// At least `min` entries, not counting any in `exclude`.
    CountAtLeast {
        metric: String,
        min: usize,
        #[serde(default)]
        exclude: Vec<String>,
    },
    All {
        of: Vec<Predicate>,
    },
    Any {
        of: Vec<Predicate>,
    },
    Not {
        of: Box<Predicate>,
    },
}

impl Predicate {
    pub fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<bool, RuleEvaluationError> {
        match self {
            Predicate::Compare { metric, op, value } => Ok(ctx
                .metric(metric)?
                .number(metric)?
                .is_some_and(|n| op.holds(n, *value))),
            Predicate::Between { metric, min, max } => {
                check_range(*min, *max)?;
                Ok(ctx
                    .metric(metric)?
                    .number(metric)?
                    .is_some_and(|n| n >= *min && n <= *max))
            }
            Predicate::Flag { metric } => ctx.metric(metric)?.flag(metric),
            Predicate::AnyChildCare { min, max } => {
                check_range(*min, *max)?;
                Ok(ctx.care_percentages().any(|c| c >= *min && c <= *max))
            }
            Predicate::HasTag { metric, tag } => {
                Ok(ctx.metric(metric)?.list(metric)?.iter().any(|t| t == tag))
            }
            Predicate::HasAnyTag { metric, tags } => Ok(ctx
                .metric(metric)?
                .list(metric)?
                .iter()
                .any(|t| tags.contains(t))),
            Predicate::CountAtLeast {
                metric,
                min,
                exclude,
            } => Ok(counted_entries(ctx, metric, exclude)? >= *min),
            Predicate::All { of } => {
                for p in of {
                    if !p.evaluate(ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Any { of } => {
                for p in of {
                    if p.evaluate(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not { of } => Ok(!of.evaluate(ctx)?),
        }
    }

    /// Number of matches: the counted entries of a satisfied
    /// `count_at_least`, otherwise one when the predicate holds.
    pub fn matches(&self, ctx: &ScoringContext<'_>) -> Result<usize, RuleEvaluationError> {
        match self {
            Predicate::CountAtLeast {
                metric,
                min,
                exclude,
            } => {
                let counted = counted_entries(ctx, metric, exclude)?;
                Ok(if counted >= *min { counted } else { 0 })
            }
            other => Ok(usize::from(other.evaluate(ctx)?)),
        }
    }

    /// Static checks run when configuration is loaded: known metrics and
    /// well-formed ranges.
    pub fn check(&self) -> Result<(), RuleEvaluationError> {
        let known = |metric: &str| {
            if METRICS.contains(&metric) {
                Ok(())
            } else {
                Err(RuleEvaluationError::UnknownMetric {
                    metric: metric.to_string(),
                })
            }
        };
        match self {
            Predicate::Compare { metric, .. }
            | Predicate::Flag { metric }
            | Predicate::HasTag { metric, .. }
            | Predicate::HasAnyTag { metric, .. }
            | Predicate::CountAtLeast { metric, .. } => known(metric),
            Predicate::Between { metric, min, max } => {
                known(metric)?;
                check_range(*min, *max)
            }
            Predicate::AnyChildCare { min, max } => check_range(*min, *max),
            Predicate::All { of } | Predicate::Any { of } => {
                of.iter().try_for_each(Predicate::check)
            }
            Predicate::Not { of } => of.check(),
        }
    }
}

fn counted_entries(
    ctx: &ScoringContext<'_>,
    metric: &str,
    exclude: &[String],
) -> Result<usize, RuleEvaluationError> {
    let items = ctx.metric(metric)?.list(metric)?;
    Ok(items.iter().filter(|t| !exclude.contains(t)).count())
}

fn check_range(min: Decimal, max: Decimal) -> Result<(), RuleEvaluationError> {
    if min > max {
        return Err(RuleEvaluationError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}
