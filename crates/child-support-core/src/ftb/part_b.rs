use serde::{Deserialize, Serialize};

use crate::rates::FtbRates;
use crate::types::{Money, ParentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartBEligibility {
    /// Over the limit on taxable income, under it once child support paid
    /// is deducted.
    EligibleViaDeduction,
    Eligible,
    Ineligible,
}

/// FTB Part B income check for the paying parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartBCheck {
    pub parent: ParentId,
    pub taxable_income: Money,
    pub child_support_paid: Money,
    pub adjusted_income: Money,
    pub primary_earner_limit: Money,
    pub eligibility: PartBEligibility,
}

pub fn check_part_b(
    parent: ParentId,
    taxable_income: Money,
    child_support_paid: Money,
    rates: &FtbRates,
) -> PartBCheck {
    let limit = rates.part_b_primary_earner_limit;
    let adjusted_income = taxable_income - child_support_paid;
    let eligibility = if adjusted_income >= limit {
        PartBEligibility::Ineligible
    } else if taxable_income > limit {
        PartBEligibility::EligibleViaDeduction
    } else {
        PartBEligibility::Eligible
    };
    PartBCheck {
        parent,
        taxable_income,
        child_support_paid,
        adjusted_income,
        primary_earner_limit: limit,
        eligibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::builtin;
    use rust_decimal_macros::dec;

    fn rates() -> FtbRates {
        builtin::table_2025_26().ftb
    }

    #[test]
    fn test_under_limit_is_eligible() {
        let check = check_part_b(ParentId::ParentA, dec!(80000), dec!(8268.69), &rates());
        assert_eq!(check.eligibility, PartBEligibility::Eligible);
        assert_eq!(check.adjusted_income, dec!(71731.31));
    }

    #[test]
    fn test_deduction_brings_under_limit() {
        let check = check_part_b(ParentId::ParentB, dec!(125000), dec!(10000), &rates());
        assert_eq!(check.eligibility, PartBEligibility::EligibleViaDeduction);
    }

    #[test]
    fn test_still_over_limit() {
        let check = check_part_b(ParentId::ParentA, dec!(200000), dec!(20000), &rates());
        assert_eq!(check.eligibility, PartBEligibility::Ineligible);
    }
}
