use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::part_b::{check_part_b, PartBCheck};
use crate::assessment::AssessmentResult;
use crate::error::ValidationError;
use crate::input::AssessmentInput;
use crate::rates::RateTableRegistry;
use crate::types::{FinancialYear, Money, ParentId, Rate};
use crate::ChildSupportResult;

/// Effect of child support received on the payee's FTB Part A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FtbImpact {
    pub financial_year: FinancialYear,
    pub payee: Option<ParentId>,
    /// Child support the payee receives in the year.
    pub maintenance_income: Money,
    pub income_free_area: Money,
    pub excess_maintenance_income: Money,
    pub taper_rate: Rate,
    pub maximum_part_a: Money,
    pub reduction_amount: Money,
    /// Change in annual Part A entitlement. Never positive.
    pub net_ftb_change: Money,
    /// The reduction hit the family's maximum Part A.
    pub reduction_capped: bool,
    /// The payee's income is above the Part A cut-off, so there is no Part A
    /// to reduce.
    pub income_cutoff_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_b: Option<PartBCheck>,
}

impl FtbImpact {
    fn none(financial_year: FinancialYear, taper_rate: Rate) -> Self {
        FtbImpact {
            financial_year,
            payee: None,
            maintenance_income: Decimal::ZERO,
            income_free_area: Decimal::ZERO,
            excess_maintenance_income: Decimal::ZERO,
            taper_rate,
            maximum_part_a: Decimal::ZERO,
            reduction_amount: Decimal::ZERO,
            net_ftb_change: Decimal::ZERO,
            reduction_capped: false,
            income_cutoff_applied: false,
            part_b: None,
        }
    }
}

/// Applies the maintenance income test to an assessment.
///
/// Reads the assessment, never modifies it. Calling twice with the same
/// arguments returns identical results.
pub fn calculate_ftb_impact(
    input: &AssessmentInput,
    assessment: &AssessmentResult,
    registry: &RateTableRegistry,
) -> ChildSupportResult<FtbImpact> {
    if assessment.financial_year != input.financial_year {
        return Err(ValidationError::single(
            "financialYear",
            format!(
                "assessment is for {} but input is for {}",
                assessment.financial_year, input.financial_year
            ),
        )
        .into());
    }
    let rates = &registry.get(&input.financial_year)?.ftb;

    let (Some(payer), Some(payee)) = (assessment.payer, assessment.payee) else {
        return Ok(FtbImpact::none(input.financial_year, rates.maintenance_taper));
    };
    if assessment.annual_liability <= Decimal::ZERO {
        return Ok(FtbImpact::none(input.financial_year, rates.maintenance_taper));
    }

    let ages = input.assessable_ages();
    let maintenance_income = assessment.annual_liability;
    let income_free_area = rates.income_free_area(ages.len());
    let excess = (maintenance_income - income_free_area).max(Decimal::ZERO);
    let maximum_part_a = rates.maximum_part_a(&ages);

    let tapered = excess * rates.maintenance_taper;
    let reduction_capped = tapered > maximum_part_a;
    let income_cutoff_applied = input.parent(payee).income > rates.part_a_income_cutoff;

    let reduction = if income_cutoff_applied {
        Decimal::ZERO
    } else {
        tapered
            .min(maximum_part_a)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    let part_b = check_part_b(
        payer,
        input.parent(payer).income,
        assessment.annual_liability,
        rates,
    );

    debug!(
        payee = %payee,
        maintenance_income = %maintenance_income,
        reduction = %reduction,
        "ftb impact calculated"
    );

    Ok(FtbImpact {
        financial_year: input.financial_year,
        payee: Some(payee),
        maintenance_income,
        income_free_area,
        excess_maintenance_income: excess,
        taper_rate: rates.maintenance_taper,
        maximum_part_a,
        reduction_amount: reduction,
        net_ftb_change: -reduction,
        reduction_capped: reduction_capped && !income_cutoff_applied,
        income_cutoff_applied,
        part_b: Some(part_b),
    })
}
