use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::care::{self, CareBand, RECEIVING_CARE_THRESHOLD};
use super::costs;
use super::fixed_rates::{self, AppliedRate, AssessmentOptions};
use super::income::{self, IncomeBase, ParentAssessment};
use crate::error::ValidationError;
use crate::input::model::ADULT_AGE;
use crate::input::{AssessmentInput, Child};
use crate::rates::{AgeGroup, CostLookup, RateTable, RateTableRegistry};
use crate::types::{FinancialYear, Money, ParentId, Percent};
use crate::ChildSupportResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicAmounts {
    pub monthly: Money,
    pub fortnightly: Money,
    pub weekly: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOfChildrenSummary {
    pub age_group: AgeGroup,
    pub child_count: usize,
    /// 1-based income band, `None` when the schedule maximum applied.
    pub band: Option<usize>,
    pub total: Money,
    pub per_child: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildAssessment {
    /// Position in the input list.
    pub index: usize,
    pub age: u8,
    /// False for children aged 18, who are listed but not assessed.
    pub assessed: bool,
    pub care: [Percent; 2],
    pub rounded_care: [Percent; 2],
    pub care_bands: [CareBand; 2],
    pub cost_percentages: [Percent; 2],
    pub child_support_percentages: [Percent; 2],
    pub liabilities: [Money; 2],
    pub multi_case_cap_applied: [bool; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub financial_year: FinancialYear,
    pub payer: Option<ParentId>,
    pub payee: Option<ParentId>,
    /// Net annual amount payable by `payer`, rounded to the cent.
    pub annual_liability: Money,
    pub periodic: PeriodicAmounts,
    pub combined_child_support_income: Money,
    pub cost_of_children: CostOfChildrenSummary,
    pub parents: [ParentAssessment; 2],
    pub children: Vec<ChildAssessment>,
    pub multi_case_applied: bool,
    /// Net liability from the pass without multi-case allowances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liability_before_multi_case: Option<Money>,
    /// Minimum or fixed annual rates that replaced formula amounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_rates: Vec<AppliedRate>,
    pub warnings: Vec<String>,
}

impl AssessmentResult {
    pub fn parent(&self, id: ParentId) -> &ParentAssessment {
        &self.parents[id.index()]
    }

    pub fn payer_assessment(&self) -> Option<&ParentAssessment> {
        self.payer.map(|id| self.parent(id))
    }

    pub fn payee_assessment(&self) -> Option<&ParentAssessment> {
        self.payee.map(|id| self.parent(id))
    }
}

fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl PeriodicAmounts {
    /// Each period is derived from the unrounded annual figure.
    fn from_annual(annual: Money) -> Self {
        PeriodicAmounts {
            monthly: round_cents(annual / dec!(12)),
            fortnightly: round_cents(annual / dec!(26)),
            weekly: round_cents(annual / dec!(52)),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Typed input can be built without the normalizer, so the invariants it
/// enforces are checked again here.
fn validate_assessment_input(input: &AssessmentInput) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    for (i, parent) in input.parents.iter().enumerate() {
        if parent.income < Decimal::ZERO {
            errors.push(format!("parents[{i}].income"), "income must not be negative");
        }
    }
    if input.children.is_empty() {
        errors.push("children", "at least one child is required");
    }
    for (i, child) in input.children.iter().enumerate() {
        if child.age > ADULT_AGE {
            errors.push(format!("children[{i}].age"), format!("{} is outside 0 to 18", child.age));
        }
        if child
            .care
            .iter()
            .any(|c| *c < Decimal::ZERO || *c > Decimal::ONE_HUNDRED)
        {
            errors.push(
                format!("children[{i}].carePercentages"),
                "care must be between 0 and 100",
            );
        } else if child.care[0] + child.care[1] != Decimal::ONE_HUNDRED {
            errors.push(
                format!("children[{i}].carePercentages"),
                format!(
                    "care percentages for child {} sum to {}, expected 100",
                    i + 1,
                    child.care[0] + child.care[1]
                ),
            );
        }
    }
    errors.into_result()
}

// ---------------------------------------------------------------------------
// Formula
// ---------------------------------------------------------------------------

/// Everything a single pass through the formula produces.
struct Pass {
    child_support_income: [Money; 2],
    income_percentages: [Percent; 2],
    combined: Money,
    cost: CostLookup,
    cost_per_child: Money,
    children: Vec<ChildAssessment>,
    totals: [Money; 2],
}

impl Pass {
    fn net(&self) -> Money {
        (self.totals[0] - self.totals[1]).abs()
    }
}

struct PassContext<'a> {
    input: &'a AssessmentInput,
    table: &'a RateTable,
    bases: [IncomeBase; 2],
    ages: Vec<u8>,
}

fn run_pass(ctx: &PassContext<'_>, allowances: [Money; 2], apply_cap: bool) -> Pass {
    let child_support_income = [
        ctx.bases[0].child_support_income(allowances[0]),
        ctx.bases[1].child_support_income(allowances[1]),
    ];
    let combined = child_support_income[0] + child_support_income[1];
    let income_percentages = income::income_percentages(child_support_income);

    let cost = ctx.table.cost_of_children.lookup(combined, &ctx.ages);
    let cost_per_child = if ctx.ages.is_empty() {
        Decimal::ZERO
    } else {
        cost.amount / Decimal::from(ctx.ages.len())
    };

    let children: Vec<ChildAssessment> = ctx
        .input
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            assess_child(ctx, index, child, income_percentages, cost_per_child, apply_cap)
        })
        .collect();

    let totals = parent_totals(&children);

    Pass {
        child_support_income,
        income_percentages,
        combined,
        cost,
        cost_per_child,
        children,
        totals,
    }
}

fn parent_totals(children: &[ChildAssessment]) -> [Money; 2] {
    [0, 1].map(|p| children.iter().map(|c| c.liabilities[p]).sum::<Money>())
}

fn assess_child(
    ctx: &PassContext<'_>,
    index: usize,
    child: &Child,
    income_percentages: [Percent; 2],
    cost_per_child: Money,
    apply_cap: bool,
) -> ChildAssessment {
    let rounded_care = child.care.map(care::round_care);
    let cost_percentages = rounded_care.map(care::cost_percentage);
    let mut assessment = ChildAssessment {
        index,
        age: child.age,
        assessed: !child.is_adult(),
        care: child.care,
        rounded_care,
        care_bands: rounded_care.map(CareBand::from_rounded),
        cost_percentages,
        child_support_percentages: [Decimal::ZERO; 2],
        liabilities: [Decimal::ZERO; 2],
        multi_case_cap_applied: [false; 2],
    };
    if !assessment.assessed {
        return assessment;
    }

    for parent in ParentId::BOTH {
        let p = parent.index();
        let cs_pct = income_percentages[p] - cost_percentages[p];
        assessment.child_support_percentages[p] = cs_pct;

        let receiver_care = rounded_care[parent.other().index()];
        if cs_pct <= Decimal::ZERO || receiver_care < RECEIVING_CARE_THRESHOLD {
            continue;
        }

        let gross = cs_pct / Decimal::ONE_HUNDRED * cost_per_child;
        let other_cases = &ctx.input.parents[p].other_case_children;
        let liability = if apply_cap && !other_cases.is_empty() {
            let cap = costs::multi_case_cap(
                &ctx.table.cost_of_children,
                ctx.bases[p].preliminary(),
                child.age,
                ctx.ages.len() + other_cases.len(),
                cost_percentages[p],
            );
            if gross > cap {
                assessment.multi_case_cap_applied[p] = true;
                cap
            } else {
                gross
            }
        } else {
            gross
        };
        assessment.liabilities[p] = liability;
    }
    assessment
}

/// Runs the child support formula for one assessment with default options.
///
/// A parent with children in other cases triggers exactly one extra pass
/// with the multi-case allowance deducted and the per-child cap applied.
/// Amounts are carried unrounded and rounded to the cent once at the end.
pub fn calculate_assessment(
    input: &AssessmentInput,
    registry: &RateTableRegistry,
) -> ChildSupportResult<AssessmentResult> {
    calculate_assessment_with(input, registry, &AssessmentOptions::default())
}

/// As [`calculate_assessment`]; `options` switches on minimum and fixed
/// annual rates.
pub fn calculate_assessment_with(
    input: &AssessmentInput,
    registry: &RateTableRegistry,
    options: &AssessmentOptions,
) -> ChildSupportResult<AssessmentResult> {
    validate_assessment_input(input)?;
    let table = registry.get(&input.financial_year)?;

    let ctx = PassContext {
        input,
        table,
        bases: [
            IncomeBase::for_parent(&input.parents[0], table),
            IncomeBase::for_parent(&input.parents[1], table),
        ],
        ages: input.assessable_ages(),
    };

    let mut warnings: Vec<String> = Vec::new();
    for (i, child) in input.children.iter().enumerate() {
        if child.is_adult() {
            warnings.push(format!(
                "Child {} is 18 and is excluded from the assessment",
                i + 1
            ));
        } else if child.age + 1 == ADULT_AGE {
            warnings.push(format!(
                "Child {} turns 18 during the year; liability for them may end early",
                i + 1
            ));
        }
    }
    if ctx.ages.is_empty() {
        warnings.push("No children under 18; no liability is assessed".into());
    }

    let first = run_pass(&ctx, [Decimal::ZERO; 2], false);
    let multi_case_applied = input.has_other_cases() && !ctx.ages.is_empty();

    let (mut pass, allowances, liability_before_multi_case) = if multi_case_applied {
        let allowances = [0, 1].map(|p| {
            costs::multi_case_allowance(
                &table.cost_of_children,
                ctx.bases[p].above_self_support,
                ctx.ages.len(),
                &input.parents[p].other_case_children,
            )
        });
        debug!(
            allowance_a = %allowances[0],
            allowance_b = %allowances[1],
            net_before = %first.net(),
            "applying multi-case allowance"
        );
        let before = round_cents(first.net());
        (run_pass(&ctx, allowances, true), allowances, Some(before))
    } else {
        (first, [Decimal::ZERO; 2], None)
    };

    let applied_rates = if options.apply_fixed_rates {
        fixed_rates::apply_fixed_rates(input, table, &mut pass.children)
    } else {
        Vec::new()
    };
    if !applied_rates.is_empty() {
        pass.totals = parent_totals(&pass.children);
        debug!(count = applied_rates.len(), "fixed annual rates applied");
    }

    if pass.combined <= Decimal::ZERO && !ctx.ages.is_empty() {
        warnings.push("Combined child support income is nil".into());
    }
    for child in &pass.children {
        for parent in ParentId::BOTH {
            if child.multi_case_cap_applied[parent.index()] {
                warnings.push(format!(
                    "Multi-case cap limits {parent}'s liability for child {}",
                    child.index + 1
                ));
            }
        }
    }

    let net = pass.net();
    let (payer, payee) = if pass.totals[0] > pass.totals[1] {
        (Some(ParentId::ParentA), Some(ParentId::ParentB))
    } else if pass.totals[1] > pass.totals[0] {
        (Some(ParentId::ParentB), Some(ParentId::ParentA))
    } else {
        (None, None)
    };
    let annual_liability = round_cents(net);
    if applied_rates.is_empty()
        && annual_liability > Decimal::ZERO
        && annual_liability < table.minimum_annual_rate
    {
        warnings.push(format!(
            "Annual liability is below the minimum annual rate of ${}; a minimum rate \
             assessment may apply",
            table.minimum_annual_rate
        ));
    }

    let parents = ParentId::BOTH.map(|id| {
        let p = id.index();
        let parent = &input.parents[p];
        ParentAssessment {
            parent: id,
            taxable_income: parent.income,
            self_support_amount: table.self_support_amount,
            self_support_status: income::self_support_status(
                parent.income,
                table.self_support_amount,
            ),
            relevant_dependent_deduction: ctx.bases[p].relevant_dependent_deduction,
            multi_case_allowance: allowances[p],
            child_support_income: pass.child_support_income[p],
            income_percentage: pass.income_percentages[p],
            annual_liability: round_cents(pass.totals[p]),
        }
    });

    debug!(
        financial_year = %input.financial_year,
        payer = ?payer,
        annual_liability = %annual_liability,
        multi_case = multi_case_applied,
        "assessment calculated"
    );

    Ok(AssessmentResult {
        financial_year: input.financial_year,
        payer,
        payee,
        annual_liability,
        periodic: PeriodicAmounts::from_annual(net),
        combined_child_support_income: pass.combined,
        cost_of_children: CostOfChildrenSummary {
            age_group: pass.cost.age_group,
            child_count: pass.cost.child_count,
            band: pass.cost.band,
            total: pass.cost.amount,
            per_child: pass.cost_per_child,
        },
        parents,
        children: pass.children,
        multi_case_applied,
        liability_before_multi_case,
        applied_rates,
        warnings,
    })
}
