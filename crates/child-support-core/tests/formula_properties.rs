use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;

use child_support_core::assessment::{calculate_assessment, AssessmentResult};
use child_support_core::ftb::calculate_ftb_impact;
use child_support_core::input::{AssessmentInput, Child, LeadContext, Parent};
use child_support_core::rates::RateTableRegistry;
use child_support_core::types::FinancialYear;

fn money() -> impl Strategy<Value = Decimal> {
    (0_i64..40_000_000_i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn year() -> impl Strategy<Value = i32> {
    prop_oneof![Just(2025), Just(2026)]
}

/// Children with whole care percentages for parent A in `care_a`.
fn children(care_a: std::ops::RangeInclusive<u32>) -> impl Strategy<Value = Vec<Child>> {
    proptest::collection::vec((0_u8..=17_u8, care_a), 1..5).prop_map(|kids| {
        kids.into_iter()
            .map(|(age, care)| {
                let care = Decimal::from(care);
                Child {
                    age,
                    care: [care, Decimal::ONE_HUNDRED - care],
                }
            })
            .collect()
    })
}

fn sample_input(year: i32, income_a: Decimal, income_b: Decimal, children: Vec<Child>) -> AssessmentInput {
    AssessmentInput {
        financial_year: FinancialYear::starting(year),
        parents: [
            Parent { income: income_a, ..Default::default() },
            Parent { income: income_b, ..Default::default() },
        ],
        children,
        lead: LeadContext::default(),
    }
}

fn assess(input: &AssessmentInput) -> AssessmentResult {
    calculate_assessment(input, &RateTableRegistry::builtin()).expect("assessment")
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn liability_is_never_negative(
        year in year(),
        income_a in money(),
        income_b in money(),
        kids in children(0..=100),
    ) {
        let result = assess(&sample_input(year, income_a, income_b, kids));
        prop_assert!(result.annual_liability >= Decimal::ZERO);
        prop_assert!(result.periodic.weekly >= Decimal::ZERO);
        for parent in &result.parents {
            prop_assert!(parent.annual_liability >= Decimal::ZERO);
        }
    }

    #[test]
    fn child_order_does_not_change_the_result(
        year in year(),
        income_a in money(),
        income_b in money(),
        kids in children(0..=100),
        shift in 0_usize..4,
    ) {
        let forward = assess(&sample_input(year, income_a, income_b, kids.clone()));

        let mut reversed = kids.clone();
        reversed.reverse();
        let mut rotated = kids;
        let len = rotated.len();
        rotated.rotate_left(shift % len);

        for reordered in [reversed, rotated] {
            let other = assess(&sample_input(year, income_a, income_b, reordered));
            prop_assert_eq!(other.annual_liability, forward.annual_liability);
            prop_assert_eq!(other.payer, forward.payer);
            prop_assert_eq!(other.cost_of_children.total, forward.cost_of_children.total);
        }
    }

    #[test]
    fn payer_liability_rises_with_payer_income(
        year in year(),
        income_a in money(),
        income_b in money(),
        raise in money(),
        kids in children(0..=100),
    ) {
        let base = assess(&sample_input(year, income_a, income_b, kids.clone()));
        let cent = assess(&sample_input(year, income_a + Decimal::new(1, 2), income_b, kids.clone()));
        let raised = assess(&sample_input(year, income_a + raise, income_b, kids));

        let own = |r: &AssessmentResult| r.parents[0].annual_liability;
        prop_assert!(own(&cent) >= own(&base), "{} then {}", own(&base), own(&cent));
        prop_assert!(own(&raised) >= own(&base), "{} then {}", own(&base), own(&raised));
    }

    #[test]
    fn net_liability_rises_with_income_of_a_sole_payer(
        year in year(),
        income_a in money(),
        income_b in money(),
        kids in children(0..=34),
    ) {
        // A has under 35% care of every child, so B is never liable.
        let base = assess(&sample_input(year, income_a, income_b, kids.clone()));
        let cent = assess(&sample_input(year, income_a + Decimal::new(1, 2), income_b, kids));
        prop_assert!(cent.annual_liability >= base.annual_liability);
    }

    #[test]
    fn ftb_recomputation_is_identical(
        year in year(),
        income_a in money(),
        income_b in money(),
        kids in children(0..=100),
    ) {
        let registry = RateTableRegistry::builtin();
        let input = sample_input(year, income_a, income_b, kids);
        let assessment = calculate_assessment(&input, &registry).expect("assessment");
        let before = assessment.clone();

        let first = calculate_ftb_impact(&input, &assessment, &registry).expect("ftb");
        let second = calculate_ftb_impact(&input, &assessment, &registry).expect("ftb");
        prop_assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
        prop_assert_eq!(assessment, before);
        prop_assert!(first.reduction_amount >= Decimal::ZERO);
    }
}
