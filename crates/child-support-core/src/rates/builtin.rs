//! Published figures for the financial years the engine ships with.
//!
//! Child support figures are the Services Australia calendar-year rates that
//! apply to assessments starting in each financial year. FTB figures for
//! 2026-27 repeat the 2025-26 figures until the new ones are published.

use rust_decimal_macros::dec;

use super::table::{
    CostOfChildrenTable, CostSchedule, FtbRates, MixedScheduleByCount, RateTable, ScheduleByCount,
};
use crate::types::{FinancialYear, Money, Rate};

fn schedule(rates: [Rate; 5], bases: [Money; 5], max: Money) -> CostSchedule {
    CostSchedule {
        rates: rates.to_vec(),
        bases: bases.to_vec(),
        max,
    }
}

fn under_13_one() -> [Rate; 5] {
    [dec!(0.17), dec!(0.15), dec!(0.12), dec!(0.10), dec!(0.07)]
}

fn under_13_two() -> [Rate; 5] {
    [dec!(0.24), dec!(0.23), dec!(0.20), dec!(0.18), dec!(0.10)]
}

fn under_13_three() -> [Rate; 5] {
    [dec!(0.27), dec!(0.26), dec!(0.25), dec!(0.24), dec!(0.18)]
}

fn teen_one() -> [Rate; 5] {
    [dec!(0.23), dec!(0.22), dec!(0.12), dec!(0.10), dec!(0.09)]
}

fn teen_two() -> [Rate; 5] {
    [dec!(0.29), dec!(0.28), dec!(0.25), dec!(0.20), dec!(0.13)]
}

fn teen_three() -> [Rate; 5] {
    [dec!(0.32), dec!(0.31), dec!(0.30), dec!(0.29), dec!(0.20)]
}

fn mixed_two() -> [Rate; 5] {
    [dec!(0.265), dec!(0.255), dec!(0.225), dec!(0.19), dec!(0.115)]
}

fn mixed_three() -> [Rate; 5] {
    [dec!(0.295), dec!(0.285), dec!(0.275), dec!(0.265), dec!(0.19)]
}


fn ftb_2025() -> FtbRates {
    FtbRates {
        income_free_area_base: dec!(2003.85),
        income_free_area_per_extra_child: dec!(667.95),
        maintenance_taper: dec!(0.50),
        part_a_income_cutoff: dec!(135000),
        part_b_primary_earner_limit: dec!(120007),
        max_part_a_under_13: dec!(6705.05),
        max_part_a_thirteen_plus: dec!(8446.20),
    }
}

pub fn table_2025_26() -> RateTable {
    RateTable {
        financial_year: FinancialYear::starting(2025),
        self_support_amount: dec!(29841),
        minimum_annual_rate: dec!(534),
        fixed_annual_rate: dec!(1768),
        parenting_payment_max: dec!(26195),
        cost_of_children: CostOfChildrenTable {
            band_limits: vec![dec!(44762), dec!(89523), dec!(134285), dec!(179046), dec!(223808)],
            under_13: ScheduleByCount {
                one: schedule(
                    under_13_one(),
                    [dec!(0), dec!(7610), dec!(14324), dec!(19695), dec!(24171)],
                    dec!(27304),
                ),
                two: schedule(
                    under_13_two(),
                    [dec!(0), dec!(10743), dec!(21038), dec!(29990), dec!(38047)],
                    dec!(42523),
                ),
                three_plus: schedule(
                    under_13_three(),
                    [dec!(0), dec!(12086), dec!(23724), dec!(34915), dec!(45658)],
                    dec!(53715),
                ),
            },
            thirteen_plus: ScheduleByCount {
                one: schedule(
                    teen_one(),
                    [dec!(0), dec!(10295), dec!(20142), dec!(25513), dec!(29989)],
                    dec!(34018),
                ),
                two: schedule(
                    teen_two(),
                    [dec!(0), dec!(12981), dec!(25514), dec!(36705), dec!(45657)],
                    dec!(51476),
                ),
                three_plus: schedule(
                    teen_three(),
                    [dec!(0), dec!(14324), dec!(28200), dec!(41629), dec!(54610)],
                    dec!(63562),
                ),
            },
            mixed: MixedScheduleByCount {
                two: schedule(
                    mixed_two(),
                    [dec!(0), dec!(11862), dec!(23276), dec!(33347), dec!(41852)],
                    dec!(47000),
                ),
                three_plus: schedule(
                    mixed_three(),
                    [dec!(0), dec!(13205), dec!(25962), dec!(38272), dec!(50134)],
                    dec!(58639),
                ),
            },
        },
        ftb: ftb_2025(),
    }
}

pub fn table_2026_27() -> RateTable {
    RateTable {
        financial_year: FinancialYear::starting(2026),
        self_support_amount: dec!(31046),
        minimum_annual_rate: dec!(551),
        fixed_annual_rate: dec!(1825),
        parenting_payment_max: dec!(26720),
        cost_of_children: CostOfChildrenTable {
            band_limits: vec![dec!(46569), dec!(93137), dec!(139706), dec!(186274), dec!(232843)],
            under_13: ScheduleByCount {
                one: schedule(
                    under_13_one(),
                    [dec!(0), dec!(7917), dec!(14902), dec!(20490), dec!(25147)],
                    dec!(28407),
                ),
                two: schedule(
                    under_13_two(),
                    [dec!(0), dec!(11177), dec!(21888), dec!(31202), dec!(39584)],
                    dec!(44241),
                ),
                three_plus: schedule(
                    under_13_three(),
                    [dec!(0), dec!(12574), dec!(24682), dec!(36324), dec!(47500)],
                    dec!(55882),
                ),
            },
            thirteen_plus: ScheduleByCount {
                one: schedule(
                    teen_one(),
                    [dec!(0), dec!(10711), dec!(20956), dec!(26544), dec!(31201)],
                    dec!(35392),
                ),
                two: schedule(
                    teen_two(),
                    [dec!(0), dec!(13505), dec!(26544), dec!(38186), dec!(47500)],
                    dec!(53554),
                ),
                three_plus: schedule(
                    teen_three(),
                    [dec!(0), dec!(14902), dec!(29338), dec!(43309), dec!(56814)],
                    dec!(66128),
                ),
            },
            mixed: MixedScheduleByCount {
                two: schedule(
                    mixed_two(),
                    [dec!(0), dec!(12341), dec!(24216), dec!(34694), dec!(43542)],
                    dec!(48897),
                ),
                three_plus: schedule(
                    mixed_three(),
                    [dec!(0), dec!(13738), dec!(27010), dec!(39816), dec!(52157)],
                    dec!(61005),
                ),
            },
        },
        // TODO: replace with the 2026-27 FTB figures once published.
        ftb: ftb_2025(),
    }
}

pub fn all() -> Vec<RateTable> {
    vec![table_2025_26(), table_2026_27()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_validate() {
        for table in all() {
            table.validate().unwrap();
        }
    }

    #[test]
    fn test_builtin_years() {
        let years: Vec<String> = all().iter().map(|t| t.financial_year.to_string()).collect();
        assert_eq!(years, vec!["2025-26", "2026-27"]);
    }
}
