//! Minimum and fixed annual rates. Both replace the formula amount for a
//! parent whose income is below the self-support amount, and both are only
//! applied when [`AssessmentOptions::apply_fixed_rates`] is set.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::formula::ChildAssessment;
use crate::input::AssessmentInput;
use crate::rates::RateTable;
use crate::types::{Money, ParentId, Percent};

/// The fixed annual rate is payable for at most this many children.
pub const FIXED_RATE_CHILD_LIMIT: usize = 3;

/// The minimum annual rate needs less than this much care of every child.
const MINIMUM_RATE_CARE_BELOW: Percent = dec!(14);

/// The fixed annual rate needs the other parent to have at least this much
/// care of the child.
const FIXED_RATE_OTHER_CARE_FROM: Percent = dec!(66);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOptions {
    #[serde(default)]
    pub apply_fixed_rates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedRate {
    MinimumAnnual,
    FixedAnnual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRate {
    pub parent: ParentId,
    pub rate: FixedRate,
    /// Child index for a fixed annual rate; `None` for the minimum annual
    /// rate, which is paid once for the whole case.
    pub child: Option<usize>,
    pub amount: Money,
}

/// Overwrites per-child liabilities where a minimum or fixed annual rate
/// applies and returns what was applied, parent A first.
pub(crate) fn apply_fixed_rates(
    input: &AssessmentInput,
    table: &RateTable,
    children: &mut [ChildAssessment],
) -> Vec<AppliedRate> {
    let assessed = children.iter().filter(|c| c.assessed).count();
    let mut applied = Vec::new();
    if assessed == 0 {
        return applied;
    }

    for parent in ParentId::BOTH {
        let p = parent.index();
        let other = parent.other().index();
        let details = &input.parents[p];
        let below_self_support = details.income < table.self_support_amount;

        let minimum_rate = below_self_support
            && details.income_support
            && children
                .iter()
                .filter(|c| c.assessed)
                .all(|c| c.rounded_care[p] < MINIMUM_RATE_CARE_BELOW);

        if minimum_rate {
            let share = table.minimum_annual_rate / Decimal::from(assessed);
            for child in children.iter_mut().filter(|c| c.assessed) {
                child.liabilities[p] = share;
            }
            applied.push(AppliedRate {
                parent,
                rate: FixedRate::MinimumAnnual,
                child: None,
                amount: table.minimum_annual_rate,
            });
            continue;
        }

        if details.income_support || details.income >= table.parenting_payment_max {
            continue;
        }
        let mut fixed = 0;
        for child in children.iter_mut().filter(|c| c.assessed) {
            if fixed == FIXED_RATE_CHILD_LIMIT {
                break;
            }
            if child.rounded_care[other] >= FIXED_RATE_OTHER_CARE_FROM {
                child.liabilities[p] = table.fixed_annual_rate;
                fixed += 1;
                applied.push(AppliedRate {
                    parent,
                    rate: FixedRate::FixedAnnual,
                    child: Some(child.index),
                    amount: table.fixed_annual_rate,
                });
            }
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{calculate_assessment, calculate_assessment_with};
    use crate::input::{Child, LeadContext, Parent};
    use crate::rates::RateTableRegistry;
    use crate::types::FinancialYear;
    use pretty_assertions::assert_eq;

    const ON: AssessmentOptions = AssessmentOptions {
        apply_fixed_rates: true,
    };

    fn sample_input(parent_a: Parent, care_a: &[Decimal]) -> AssessmentInput {
        AssessmentInput {
            financial_year: FinancialYear::starting(2025),
            parents: [
                parent_a,
                Parent {
                    income: dec!(60000),
                    ..Default::default()
                },
            ],
            children: care_a
                .iter()
                .map(|&care| Child {
                    age: 7,
                    care: [care, Decimal::ONE_HUNDRED - care],
                })
                .collect(),
            lead: LeadContext::default(),
        }
    }

    fn on_income_support(income: Decimal) -> Parent {
        Parent {
            income,
            income_support: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_minimum_rate_split_across_children() {
        let input = sample_input(on_income_support(dec!(20000)), &[dec!(0), dec!(10)]);
        let result = calculate_assessment_with(&input, &RateTableRegistry::builtin(), &ON).unwrap();

        assert_eq!(result.payer, Some(ParentId::ParentA));
        assert_eq!(result.annual_liability, dec!(534));
        assert_eq!(result.children[0].liabilities[0], dec!(267));
        assert_eq!(
            result.applied_rates,
            vec![AppliedRate {
                parent: ParentId::ParentA,
                rate: FixedRate::MinimumAnnual,
                child: None,
                amount: dec!(534),
            }]
        );
    }

    #[test]
    fn test_minimum_rate_needs_under_14_percent_care() {
        let input = sample_input(on_income_support(dec!(20000)), &[dec!(20)]);
        let result = calculate_assessment_with(&input, &RateTableRegistry::builtin(), &ON).unwrap();
        assert_eq!(result.annual_liability, Decimal::ZERO);
        assert!(result.applied_rates.is_empty());
    }

    #[test]
    fn test_fixed_rate_for_at_most_three_children() {
        let parent = Parent {
            income: dec!(25000),
            ..Default::default()
        };
        let input = sample_input(parent, &[dec!(0), dec!(0), dec!(0), dec!(0)]);
        let result = calculate_assessment_with(&input, &RateTableRegistry::builtin(), &ON).unwrap();

        assert_eq!(result.annual_liability, dec!(5304));
        let children: Vec<Option<usize>> = result.applied_rates.iter().map(|r| r.child).collect();
        assert_eq!(children, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(result.children[3].liabilities[0], Decimal::ZERO);
    }

    #[test]
    fn test_fixed_rate_needs_other_parent_with_66_percent_care() {
        let parent = Parent {
            income: dec!(25000),
            ..Default::default()
        };
        let input = sample_input(parent, &[dec!(40)]);
        let result = calculate_assessment_with(&input, &RateTableRegistry::builtin(), &ON).unwrap();
        assert!(result.applied_rates.is_empty());
    }

    #[test]
    fn test_rates_not_applied_by_default() {
        let input = sample_input(on_income_support(dec!(20000)), &[dec!(0)]);
        let result = calculate_assessment(&input, &RateTableRegistry::builtin()).unwrap();
        assert_eq!(result.annual_liability, Decimal::ZERO);
        assert!(result.applied_rates.is_empty());
    }
}
