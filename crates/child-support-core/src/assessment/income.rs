use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::costs;
use crate::input::Parent;
use crate::rates::RateTable;
use crate::types::{Money, ParentId, Percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfSupportStatus {
    /// Income at or below the self-support amount; no child support income.
    BelowSelfSupport,
    AboveSelfSupport,
}

/// Per-parent income steps and liability in an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentAssessment {
    pub parent: ParentId,
    pub taxable_income: Money,
    pub self_support_amount: Money,
    pub self_support_status: SelfSupportStatus,
    pub relevant_dependent_deduction: Money,
    pub multi_case_allowance: Money,
    pub child_support_income: Money,
    pub income_percentage: Percent,
    /// This parent's own liability before netting against the other parent.
    pub annual_liability: Money,
}

/// Income figures that do not depend on the other parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IncomeBase {
    pub above_self_support: Money,
    pub relevant_dependent_deduction: Money,
}

impl IncomeBase {
    pub fn for_parent(parent: &Parent, table: &RateTable) -> Self {
        let above_self_support = (parent.income - table.self_support_amount).max(Decimal::ZERO);
        let relevant_dependent_deduction = costs::relevant_dependent_deduction(
            &table.cost_of_children,
            above_self_support,
            &parent.relevant_dependents,
        );
        IncomeBase {
            above_self_support,
            relevant_dependent_deduction,
        }
    }

    /// Income after relevant dependents, before any multi-case allowance.
    pub fn preliminary(&self) -> Money {
        (self.above_self_support - self.relevant_dependent_deduction).max(Decimal::ZERO)
    }

    pub fn child_support_income(&self, multi_case_allowance: Money) -> Money {
        (self.preliminary() - multi_case_allowance).max(Decimal::ZERO)
    }
}

pub fn self_support_status(income: Money, self_support_amount: Money) -> SelfSupportStatus {
    if income <= self_support_amount {
        SelfSupportStatus::BelowSelfSupport
    } else {
        SelfSupportStatus::AboveSelfSupport
    }
}

/// Each parent's share of the combined income. A nil combined income gives
/// both parents 0%.
pub fn income_percentages(child_support_income: [Money; 2]) -> [Percent; 2] {
    let combined = child_support_income[0] + child_support_income[1];
    if combined <= Decimal::ZERO {
        return [Decimal::ZERO; 2];
    }
    child_support_income.map(|csi| csi / combined * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RelevantDependents;
    use crate::rates::builtin;
    use rust_decimal_macros::dec;

    #[test]
    fn test_income_base_subtracts_self_support() {
        let table = builtin::table_2025_26();
        let parent = Parent {
            income: dec!(80000),
            ..Default::default()
        };
        let base = IncomeBase::for_parent(&parent, &table);
        assert_eq!(base.above_self_support, dec!(50159));
        assert_eq!(base.child_support_income(Decimal::ZERO), dec!(50159));
    }

    #[test]
    fn test_income_base_with_relevant_dependent() {
        let table = builtin::table_2025_26();
        let parent = Parent {
            income: dec!(80000),
            relevant_dependents: RelevantDependents { under_13: 1, thirteen_plus: 0 },
            ..Default::default()
        };
        let base = IncomeBase::for_parent(&parent, &table);
        assert_eq!(base.relevant_dependent_deduction, dec!(8419.55));
        assert_eq!(base.preliminary(), dec!(41739.45));
    }

    #[test]
    fn test_income_below_self_support_floors_at_zero() {
        let table = builtin::table_2025_26();
        let parent = Parent {
            income: dec!(20000),
            ..Default::default()
        };
        let base = IncomeBase::for_parent(&parent, &table);
        assert_eq!(base.above_self_support, Decimal::ZERO);
        assert_eq!(base.child_support_income(dec!(1000)), Decimal::ZERO);
        assert_eq!(
            self_support_status(parent.income, table.self_support_amount),
            SelfSupportStatus::BelowSelfSupport
        );
    }

    #[test]
    fn test_income_percentages() {
        let pcts = income_percentages([dec!(30000), dec!(10000)]);
        assert_eq!(pcts, [dec!(75), dec!(25)]);
        assert_eq!(income_percentages([Decimal::ZERO; 2]), [Decimal::ZERO; 2]);
    }
}
