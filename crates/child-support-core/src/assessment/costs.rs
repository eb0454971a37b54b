//! Cost-of-children figures derived from a single parent's income: the
//! relevant dependent deduction and the multi-case allowance and cap.

use std::iter;

use rust_decimal::Decimal;

use crate::input::RelevantDependents;
use crate::rates::CostOfChildrenTable;
use crate::types::{Money, Percent};

/// Representative ages used to place relevant dependents in an age group.
const DEPENDENT_UNDER_13_AGE: u8 = 6;
const DEPENDENT_13_PLUS_AGE: u8 = 14;

/// Cost of a parent's relevant dependents, as if they were the only
/// children, at the parent's income above self-support.
pub fn relevant_dependent_deduction(
    table: &CostOfChildrenTable,
    income_above_self_support: Money,
    dependents: &RelevantDependents,
) -> Money {
    if dependents.total() == 0 {
        return Decimal::ZERO;
    }
    let ages: Vec<u8> = iter::repeat(DEPENDENT_UNDER_13_AGE)
        .take(usize::from(dependents.under_13))
        .chain(iter::repeat(DEPENDENT_13_PLUS_AGE).take(usize::from(dependents.thirteen_plus)))
        .collect();
    table.lookup(income_above_self_support, &ages).amount
}

/// Cost per child when all of a parent's children are treated as `age`.
fn same_age_cost_per_child(
    table: &CostOfChildrenTable,
    income: Money,
    age: u8,
    total_children: usize,
) -> Money {
    if total_children == 0 {
        return Decimal::ZERO;
    }
    let ages = vec![age; total_children];
    table.lookup(income, &ages).amount / Decimal::from(total_children)
}

/// Multi-case allowance: for each child in another case, the same-age cost
/// per child across all of the parent's children.
pub fn multi_case_allowance(
    table: &CostOfChildrenTable,
    income_above_self_support: Money,
    case_children: usize,
    other_case_ages: &[u8],
) -> Money {
    let total = case_children + other_case_ages.len();
    other_case_ages
        .iter()
        .map(|&age| same_age_cost_per_child(table, income_above_self_support, age, total))
        .sum()
}

/// Ceiling on a multi-case parent's liability for one child.
pub fn multi_case_cap(
    table: &CostOfChildrenTable,
    income: Money,
    child_age: u8,
    total_children: usize,
    cost_percentage: Percent,
) -> Money {
    let uncovered = (Decimal::ONE_HUNDRED - cost_percentage) / Decimal::ONE_HUNDRED;
    same_age_cost_per_child(table, income, child_age, total_children) * uncovered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::builtin;
    use rust_decimal_macros::dec;

    fn costs_2025() -> CostOfChildrenTable {
        builtin::table_2025_26().cost_of_children
    }

    #[test]
    fn test_no_dependents_no_deduction() {
        let deduction =
            relevant_dependent_deduction(&costs_2025(), dec!(50159), &RelevantDependents::default());
        assert_eq!(deduction, Decimal::ZERO);
    }

    #[test]
    fn test_one_young_dependent() {
        let deps = RelevantDependents { under_13: 1, thirteen_plus: 0 };
        // 7610 + (50159 - 44762) * 15%
        assert_eq!(
            relevant_dependent_deduction(&costs_2025(), dec!(50159), &deps),
            dec!(8419.55)
        );
    }

    #[test]
    fn test_mixed_dependents_use_mixed_schedule() {
        let deps = RelevantDependents { under_13: 1, thirteen_plus: 1 };
        // 40000 * 26.5%
        assert_eq!(
            relevant_dependent_deduction(&costs_2025(), dec!(40000), &deps),
            dec!(10600)
        );
    }

    #[test]
    fn test_multi_case_allowance_single_other_child() {
        // two children at age 4 on 60159: 10743 + (60159 - 44762) * 23% = 14284.31
        let allowance = multi_case_allowance(&costs_2025(), dec!(60159), 1, &[4]);
        assert_eq!(allowance, dec!(7142.155));
    }

    #[test]
    fn test_multi_case_allowance_sums_per_other_child() {
        let one = multi_case_allowance(&costs_2025(), dec!(60159), 1, &[4]);
        let two = multi_case_allowance(&costs_2025(), dec!(60159), 1, &[4, 4]);
        // three children under 13: 12086 + 15397 * 26% = 16089.22, a third each
        assert_eq!(two.round_dp(2), dec!(10726.15));
        assert!(two > one);
    }

    #[test]
    fn test_multi_case_cap_scales_by_cost_percentage() {
        let full = multi_case_cap(&costs_2025(), dec!(60159), 8, 2, Decimal::ZERO);
        let shared = multi_case_cap(&costs_2025(), dec!(60159), 8, 2, dec!(24));
        assert_eq!(full, dec!(7142.155));
        assert_eq!(shared, dec!(7142.155) * dec!(0.76));
    }
}
