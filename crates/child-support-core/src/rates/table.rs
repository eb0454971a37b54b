use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ChildSupportError;
use crate::types::{FinancialYear, Money, Rate};
use crate::ChildSupportResult;

/// Children of this age and over use the 13+ cost schedules.
pub const TEENAGE_FROM: u8 = 13;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Statutory figures for one financial year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub financial_year: FinancialYear,
    pub self_support_amount: Money,
    /// Minimum annual rate. Warned about by default, applied only when
    /// fixed rates are switched on.
    pub minimum_annual_rate: Money,
    #[serde(default)]
    pub fixed_annual_rate: Money,
    /// Maximum Parenting Payment (single); below it a parent with no income
    /// support pays the fixed annual rate.
    #[serde(default)]
    pub parenting_payment_max: Money,
    pub cost_of_children: CostOfChildrenTable,
    pub ftb: FtbRates,
}

/// One banded schedule: the marginal rate and the cost at the start of each
/// band, plus the overall maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSchedule {
    pub rates: Vec<Rate>,
    pub bases: Vec<Money>,
    pub max: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleByCount {
    pub one: CostSchedule,
    pub two: CostSchedule,
    pub three_plus: CostSchedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedScheduleByCount {
    pub two: CostSchedule,
    pub three_plus: CostSchedule,
}

/// The costs of the children table. `band_limits` are the inclusive upper
/// limits of each combined income band; every schedule has one rate and one
/// base per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOfChildrenTable {
    pub band_limits: Vec<Money>,
    pub under_13: ScheduleByCount,
    pub thirteen_plus: ScheduleByCount,
    pub mixed: MixedScheduleByCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Under13,
    ThirteenPlus,
    Mixed,
}

impl AgeGroup {
    pub fn of(ages: &[u8]) -> AgeGroup {
        let teens = ages.iter().filter(|&&a| a >= TEENAGE_FROM).count();
        if teens == 0 {
            AgeGroup::Under13
        } else if teens == ages.len() {
            AgeGroup::ThirteenPlus
        } else {
            AgeGroup::Mixed
        }
    }
}

/// Result of a cost of children lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLookup {
    pub amount: Money,
    pub age_group: AgeGroup,
    pub child_count: usize,
    /// 1-based income band; `None` above the last band (schedule maximum).
    pub band: Option<usize>,
}

/// Family Tax Benefit figures used by the maintenance income test and the
/// Part B income check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FtbRates {
    pub income_free_area_base: Money,
    pub income_free_area_per_extra_child: Money,
    pub maintenance_taper: Rate,
    /// Above this family income no Part A is paid.
    pub part_a_income_cutoff: Money,
    pub part_b_primary_earner_limit: Money,
    pub max_part_a_under_13: Money,
    pub max_part_a_thirteen_plus: Money,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

impl CostOfChildrenTable {
    fn schedule(&self, group: AgeGroup, count: usize) -> &CostSchedule {
        match (group, count) {
            (AgeGroup::Under13, 1) | (AgeGroup::Mixed, 1) => &self.under_13.one,
            (AgeGroup::Under13, 2) => &self.under_13.two,
            (AgeGroup::Under13, _) => &self.under_13.three_plus,
            (AgeGroup::ThirteenPlus, 1) => &self.thirteen_plus.one,
            (AgeGroup::ThirteenPlus, 2) => &self.thirteen_plus.two,
            (AgeGroup::ThirteenPlus, _) => &self.thirteen_plus.three_plus,
            (AgeGroup::Mixed, 2) => &self.mixed.two,
            (AgeGroup::Mixed, _) => &self.mixed.three_plus,
        }
    }

    /// Cost of the children with the given ages at a combined child support
    /// income. Negative incomes are treated as nil.
    pub fn lookup(&self, combined_income: Money, ages: &[u8]) -> CostLookup {
        let age_group = AgeGroup::of(ages);
        let child_count = ages.len();
        if child_count == 0 {
            return CostLookup {
                amount: Decimal::ZERO,
                age_group,
                child_count,
                band: None,
            };
        }

        let income = combined_income.max(Decimal::ZERO);
        let schedule = self.schedule(age_group, child_count);
        let band_index = self.band_limits.iter().position(|limit| income <= *limit);

        let amount = match band_index {
            None => schedule.max,
            Some(i) => {
                let band_start = if i == 0 {
                    Decimal::ZERO
                } else {
                    self.band_limits[i - 1]
                };
                (self.band_floor(schedule, i) + (income - band_start) * schedule.rates[i])
                    .min(schedule.max)
            }
        };

        CostLookup {
            amount,
            age_group,
            child_count,
            band: band_index.map(|i| i + 1),
        }
    }

    /// Cost at the start of `band`: the published base, raised to where the
    /// previous band ends when the published base sits below it. Keeps the
    /// schedule non-decreasing across band limits.
    fn band_floor(&self, schedule: &CostSchedule, band: usize) -> Money {
        let mut floor = schedule.bases[0];
        let mut start = Decimal::ZERO;
        for i in 1..=band {
            let end = floor + (self.band_limits[i - 1] - start) * schedule.rates[i - 1];
            floor = schedule.bases[i].max(end);
            start = self.band_limits[i - 1];
        }
        floor
    }

    fn schedules(&self) -> [(&'static str, &CostSchedule); 8] {
        [
            ("under_13.one", &self.under_13.one),
            ("under_13.two", &self.under_13.two),
            ("under_13.three_plus", &self.under_13.three_plus),
            ("thirteen_plus.one", &self.thirteen_plus.one),
            ("thirteen_plus.two", &self.thirteen_plus.two),
            ("thirteen_plus.three_plus", &self.thirteen_plus.three_plus),
            ("mixed.two", &self.mixed.two),
            ("mixed.three_plus", &self.mixed.three_plus),
        ]
    }

    pub fn validate(&self, prefix: &str) -> ChildSupportResult<()> {
        if self.band_limits.is_empty() {
            return Err(ChildSupportError::invalid_config(
                format!("{prefix}.band_limits"),
                "at least one band is required",
            ));
        }
        if self.band_limits[0] <= Decimal::ZERO
            || self.band_limits.windows(2).any(|w| w[1] <= w[0])
        {
            return Err(ChildSupportError::invalid_config(
                format!("{prefix}.band_limits"),
                "band limits must be positive and strictly ascending",
            ));
        }

        let bands = self.band_limits.len();
        for (name, schedule) in self.schedules() {
            let field = format!("{prefix}.{name}");
            if schedule.rates.len() != bands || schedule.bases.len() != bands {
                return Err(ChildSupportError::invalid_config(
                    field,
                    format!("expected {bands} rates and {bands} bases"),
                ));
            }
            if schedule
                .rates
                .iter()
                .any(|r| *r < Decimal::ZERO || *r > Decimal::ONE)
            {
                return Err(ChildSupportError::invalid_config(
                    field,
                    "rates must be between 0 and 1",
                ));
            }
            if schedule.bases.iter().any(|b| *b < Decimal::ZERO) || schedule.max <= Decimal::ZERO {
                return Err(ChildSupportError::invalid_config(
                    field,
                    "bases must be non-negative and max positive",
                ));
            }
        }
        Ok(())
    }
}

impl FtbRates {
    /// Maintenance income free area for a family with `children` children.
    pub fn income_free_area(&self, children: usize) -> Money {
        let extra = children.saturating_sub(1);
        self.income_free_area_base + self.income_free_area_per_extra_child * Decimal::from(extra)
    }

    /// Maximum annual Part A for the family, summed per child by age.
    pub fn maximum_part_a(&self, ages: &[u8]) -> Money {
        ages.iter()
            .map(|&age| {
                if age >= TEENAGE_FROM {
                    self.max_part_a_thirteen_plus
                } else {
                    self.max_part_a_under_13
                }
            })
            .sum()
    }

    pub fn validate(&self, prefix: &str) -> ChildSupportResult<()> {
        let amounts = [
            ("income_free_area_base", self.income_free_area_base),
            ("income_free_area_per_extra_child", self.income_free_area_per_extra_child),
            ("part_a_income_cutoff", self.part_a_income_cutoff),
            ("part_b_primary_earner_limit", self.part_b_primary_earner_limit),
            ("max_part_a_under_13", self.max_part_a_under_13),
            ("max_part_a_thirteen_plus", self.max_part_a_thirteen_plus),
        ];
        for (name, amount) in amounts {
            if amount < Decimal::ZERO {
                return Err(ChildSupportError::invalid_config(
                    format!("{prefix}.{name}"),
                    "must not be negative",
                ));
            }
        }
        if self.maintenance_taper < Decimal::ZERO || self.maintenance_taper > Decimal::ONE {
            return Err(ChildSupportError::invalid_config(
                format!("{prefix}.maintenance_taper"),
                "must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

impl RateTable {
    pub fn validate(&self) -> ChildSupportResult<()> {
        let prefix = format!("rate_tables[{}]", self.financial_year);
        if self.self_support_amount < Decimal::ZERO {
            return Err(ChildSupportError::invalid_config(
                format!("{prefix}.self_support_amount"),
                "must not be negative",
            ));
        }
        let rates = [
            ("minimum_annual_rate", self.minimum_annual_rate),
            ("fixed_annual_rate", self.fixed_annual_rate),
            ("parenting_payment_max", self.parenting_payment_max),
        ];
        for (name, amount) in rates {
            if amount < Decimal::ZERO {
                return Err(ChildSupportError::invalid_config(
                    format!("{prefix}.{name}"),
                    "must not be negative",
                ));
            }
        }
        self.cost_of_children
            .validate(&format!("{prefix}.cost_of_children"))?;
        self.ftb.validate(&format!("{prefix}.ftb"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::builtin;
    use rust_decimal_macros::dec;

    fn table_2025() -> RateTable {
        builtin::table_2025_26()
    }

    #[test]
    fn test_age_group_classification() {
        assert_eq!(AgeGroup::of(&[3, 12]), AgeGroup::Under13);
        assert_eq!(AgeGroup::of(&[13, 17]), AgeGroup::ThirteenPlus);
        assert_eq!(AgeGroup::of(&[8, 14]), AgeGroup::Mixed);
    }

    #[test]
    fn test_lookup_first_band() {
        let cost = table_2025().cost_of_children.lookup(dec!(40000), &[8]);
        // 40000 * 17%
        assert_eq!(cost.amount, dec!(6800));
        assert_eq!(cost.band, Some(1));
    }

    #[test]
    fn test_lookup_second_band_one_child() {
        let cost = table_2025().cost_of_children.lookup(dec!(60318), &[8]);
        // 7610 + (60318 - 44762) * 15%
        assert_eq!(cost.amount, dec!(9943.40));
        assert_eq!(cost.band, Some(2));
    }

    #[test]
    fn test_lookup_band_limit_is_inclusive() {
        let cost = table_2025().cost_of_children.lookup(dec!(44762), &[8]);
        assert_eq!(cost.band, Some(1));
        assert_eq!(cost.amount, dec!(7609.54));
    }

    #[test]
    fn test_lookup_above_cap_uses_max() {
        let cost = table_2025().cost_of_children.lookup(dec!(500000), &[15, 16]);
        assert_eq!(cost.amount, dec!(51476));
        assert_eq!(cost.band, None);
    }

    #[test]
    fn test_lookup_three_plus_children_share_schedule() {
        let table = table_2025();
        let three = table.cost_of_children.lookup(dec!(100000), &[1, 2, 3]);
        let four = table.cost_of_children.lookup(dec!(100000), &[1, 2, 3, 4]);
        assert_eq!(three.amount, four.amount);
        assert_eq!(four.child_count, 4);
    }

    #[test]
    fn test_lookup_mixed_two_children() {
        let cost = table_2025().cost_of_children.lookup(dec!(100000), &[8, 14]);
        // band 2 ends at 11862 + 44761 * 25.5% = 23276.055, above the 23276 base
        assert_eq!(cost.amount, dec!(25633.380));
        assert_eq!(cost.age_group, AgeGroup::Mixed);
    }

    #[test]
    fn test_lookup_nil_income_and_no_children() {
        let table = table_2025();
        assert_eq!(table.cost_of_children.lookup(Decimal::ZERO, &[5]).amount, Decimal::ZERO);
        assert_eq!(table.cost_of_children.lookup(dec!(90000), &[]).amount, Decimal::ZERO);
    }

    #[test]
    fn test_band_start_never_below_previous_band_end() {
        // published base 14324, band 2 ends at 7610 + 44761 * 15% = 14324.15
        let costs = table_2025().cost_of_children;
        assert_eq!(costs.lookup(dec!(89523), &[8]).amount, dec!(14324.15));
        assert_eq!(costs.lookup(dec!(89523.01), &[8]).amount, dec!(14324.1512));
    }

    #[test]
    fn test_lookup_non_decreasing_across_every_band_limit() {
        let age_sets: [&[u8]; 8] = [
            &[8],
            &[5, 9],
            &[1, 2, 3],
            &[14],
            &[13, 16],
            &[13, 14, 15],
            &[8, 14],
            &[3, 8, 14],
        ];
        for table in builtin::all() {
            let costs = &table.cost_of_children;
            for ages in age_sets {
                for limit in &costs.band_limits {
                    let at = costs.lookup(*limit, ages).amount;
                    let above = costs.lookup(*limit + dec!(0.01), ages).amount;
                    assert!(
                        above >= at,
                        "{} {:?} at {}: {} then {}",
                        table.financial_year,
                        ages,
                        limit,
                        at,
                        above
                    );
                }
            }
        }
    }

    #[test]
    fn test_income_free_area_per_extra_child() {
        let ftb = table_2025().ftb;
        assert_eq!(ftb.income_free_area(1), dec!(2003.85));
        assert_eq!(ftb.income_free_area(3), dec!(3339.75));
    }

    #[test]
    fn test_maximum_part_a_by_age() {
        let ftb = table_2025().ftb;
        assert_eq!(ftb.maximum_part_a(&[4, 15]), dec!(15151.25));
    }

    #[test]
    fn test_validate_rejects_descending_bands() {
        let mut table = table_2025();
        table.cost_of_children.band_limits.swap(0, 1);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("band_limits"));
    }

    #[test]
    fn test_validate_rejects_short_schedule() {
        let mut table = table_2025();
        table.cost_of_children.mixed.two.rates.pop();
        assert!(table.validate().is_err());
    }
}
