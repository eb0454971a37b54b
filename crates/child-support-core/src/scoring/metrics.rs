use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::assessment::AssessmentResult;
use crate::error::RuleEvaluationError;
use crate::ftb::FtbImpact;
use crate::input::AssessmentInput;
use crate::types::Percent;

/// A named value rules can test.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue<'a> {
    Number(Decimal),
    Flag(bool),
    List(&'a [String]),
    /// The metric exists but has no value for this lead.
    Missing,
}

/// Names accepted by [`ScoringContext::metric`].
pub const METRICS: &[&str] = &[
    "annual_liability",
    "monthly_liability",
    "combined_income",
    "total_taxable_income",
    "payer_income",
    "payee_income",
    "child_count",
    "assessable_child_count",
    "ftb_reduction",
    "days_until_court",
    "has_payer",
    "multi_case_applied",
    "binding_agreement",
    "below_self_support",
    "special_circumstances",
    "financial_tags",
];

/// Read-only view over one computed estimate.
pub struct ScoringContext<'a> {
    pub input: &'a AssessmentInput,
    pub assessment: &'a AssessmentResult,
    pub ftb: &'a FtbImpact,
    pub as_of: NaiveDate,
}

impl<'a> ScoringContext<'a> {
    pub fn metric(&self, name: &str) -> Result<MetricValue<'a>, RuleEvaluationError> {
        let assessment = self.assessment;
        let input = self.input;
        let value = match name {
            "annual_liability" => MetricValue::Number(assessment.annual_liability),
            "monthly_liability" => MetricValue::Number(assessment.periodic.monthly),
            "combined_income" => MetricValue::Number(assessment.combined_child_support_income),
            "total_taxable_income" => {
                MetricValue::Number(input.parents.iter().map(|p| p.income).sum())
            }
            "payer_income" => assessment
                .payer
                .map(|id| MetricValue::Number(input.parent(id).income))
                .unwrap_or(MetricValue::Missing),
            "payee_income" => assessment
                .payee
                .map(|id| MetricValue::Number(input.parent(id).income))
                .unwrap_or(MetricValue::Missing),
            "child_count" => MetricValue::Number(Decimal::from(input.children.len())),
            "assessable_child_count" => {
                MetricValue::Number(Decimal::from(input.assessable_children().count()))
            }
            "ftb_reduction" => MetricValue::Number(self.ftb.reduction_amount),
            "days_until_court" => input
                .lead
                .court_date
                .map(|date| MetricValue::Number(Decimal::from((date - self.as_of).num_days())))
                .unwrap_or(MetricValue::Missing),
            "has_payer" => MetricValue::Flag(assessment.payer.is_some()),
            "multi_case_applied" => MetricValue::Flag(assessment.multi_case_applied),
            "binding_agreement" => MetricValue::Flag(input.lead.binding_agreement),
            "below_self_support" => MetricValue::Flag(assessment.parents.iter().any(|p| {
                p.self_support_status == crate::assessment::SelfSupportStatus::BelowSelfSupport
            })),
            "special_circumstances" => MetricValue::List(&input.lead.special_circumstances),
            "financial_tags" => MetricValue::List(&input.lead.financial_tags),
            _ => {
                return Err(RuleEvaluationError::UnknownMetric {
                    metric: name.to_string(),
                })
            }
        };
        Ok(value)
    }

    /// Care percentages of every assessed child, both parents.
    pub fn care_percentages(&self) -> impl Iterator<Item = Percent> + 'a {
        self.input
            .assessable_children()
            .flat_map(|child| child.care)
    }
}

impl<'a> MetricValue<'a> {
    pub fn number(self, metric: &str) -> Result<Option<Decimal>, RuleEvaluationError> {
        match self {
            MetricValue::Number(n) => Ok(Some(n)),
            MetricValue::Missing => Ok(None),
            _ => Err(RuleEvaluationError::TypeMismatch {
                metric: metric.to_string(),
                expected: "number",
            }),
        }
    }

    pub fn flag(self, metric: &str) -> Result<bool, RuleEvaluationError> {
        match self {
            MetricValue::Flag(b) => Ok(b),
            MetricValue::Missing => Ok(false),
            _ => Err(RuleEvaluationError::TypeMismatch {
                metric: metric.to_string(),
                expected: "flag",
            }),
        }
    }

    pub fn list(self, metric: &str) -> Result<&'a [String], RuleEvaluationError> {
        match self {
            MetricValue::List(items) => Ok(items),
            MetricValue::Missing => Ok(&[]),
            _ => Err(RuleEvaluationError::TypeMismatch {
                metric: metric.to_string(),
                expected: "list",
            }),
        }
    }
}
