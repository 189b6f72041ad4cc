//! Year-level properties of the cumulative withholding engine.

use iit_core::{
    AnnualConfiguration, AnnualSummary, FieldOverride, MonthlyOverride, SocialInsurance,
    SpecialDeduction, SpecialDeductionOverride, WithholdingEngine, WithholdingRules,
};
use pretty_assertions::assert_eq;
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use proptest::collection::vec;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn cents(value: u32) -> Decimal {
    Decimal::new(i64::from(value), 2)
}

fn summarize(config: &AnnualConfiguration) -> AnnualSummary {
    WithholdingEngine::new(WithholdingRules::comprehensive_income()).compute_annual_summary(config)
}

fn monthly_sum(summary: &AnnualSummary) -> Decimal {
    summary.monthly_details.iter().map(|r| r.monthly_tax).sum()
}

/// Salary changes every month through overrides, deductions stay constant.
fn varying_salary_config(
    salaries: &[u32],
    social_insurance: u32,
    special_deduction: u32,
) -> AnnualConfiguration {
    let mut config = AnnualConfiguration::uniform(
        2025,
        dec!(0),
        SocialInsurance {
            pension: cents(social_insurance),
            ..Default::default()
        },
        SpecialDeduction {
            housing_rent: cents(special_deduction),
            ..Default::default()
        },
    );
    config.monthly_overrides = salaries
        .iter()
        .zip(1..)
        .map(|(salary, month)| MonthlyOverride {
            gross_salary: FieldOverride::Override(cents(*salary)),
            use_custom: true,
            ..MonthlyOverride::empty(month)
        })
        .collect();
    config
}

#[test]
fn high_earner_walks_through_several_brackets() {
    init_tracing();
    let config = AnnualConfiguration::uniform(
        2025,
        dec!(100000),
        SocialInsurance {
            pension: dec!(2000),
            unemployment: dec!(125),
            medical: dec!(500),
            housing_fund: dec!(3000),
        },
        SpecialDeduction {
            child_education: dec!(2000),
            elderly_support: dec!(3000),
            ..Default::default()
        },
    );

    let summary = summarize(&config);
    let levels: Vec<u8> = summary
        .monthly_details
        .iter()
        .map(|r| r.bracket_level)
        .collect();

    // 100000 − 5625 − 5000 − 5000 = 84375 taxable per month
    assert_eq!(levels, vec![2, 3, 3, 4, 5, 5, 5, 6, 6, 6, 6, 7]);
    assert_eq!(summary.total_taxable_income, dec!(1012500));
    // 1012500 × 45% − 181920
    assert_eq!(summary.total_tax, dec!(273705.00));
    assert_eq!(monthly_sum(&summary), summary.total_tax);
}

#[test]
fn summary_lists_months_in_calendar_order() {
    let summary = summarize(&AnnualConfiguration::uniform(
        2023,
        dec!(12345.67),
        SocialInsurance::default(),
        SpecialDeduction::default(),
    ));

    assert_eq!(summary.year, 2023);
    assert_eq!(
        summary
            .monthly_details
            .iter()
            .map(|r| r.month)
            .collect::<Vec<_>>(),
        (1..=12u32).collect::<Vec<_>>()
    );
}

#[test]
fn deduction_switched_off_mid_year_increases_withholding() {
    let mut config = AnnualConfiguration::uniform(
        2025,
        dec!(20000),
        SocialInsurance::default(),
        SpecialDeduction {
            housing_loan: dec!(1000),
            ..Default::default()
        },
    );
    for month in 7..=12 {
        config.monthly_overrides.push(MonthlyOverride {
            special_deduction: SpecialDeductionOverride {
                housing_loan: FieldOverride::Override(dec!(0)),
                ..Default::default()
            },
            use_custom: true,
            ..MonthlyOverride::empty(month)
        });
    }

    let summary = summarize(&config);
    let june = &summary.monthly_details[5];
    let july = &summary.monthly_details[6];

    // Dropping the deduction also drops the six months already claimed
    assert_eq!(june.cumulative_deduction, dec!(36000));
    assert_eq!(july.cumulative_deduction, dec!(35000));
    assert!(july.monthly_tax > june.monthly_tax);
    assert_eq!(monthly_sum(&summary), summary.total_tax);
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_withholding_never_decreases_and_covers_cumulative_tax(
        salaries in vec(0u32..6_000_000, 12),
        social_insurance in 0u32..500_000,
        special_deduction in 0u32..800_000,
    ) {
        let summary = summarize(&varying_salary_config(&salaries, social_insurance, special_deduction));

        let mut previous = Decimal::ZERO;
        for result in &summary.monthly_details {
            prop_assert!(result.monthly_tax >= Decimal::ZERO);
            prop_assert!(result.cumulative_tax_withheld >= previous);
            prop_assert!(result.cumulative_tax_withheld >= result.cumulative_tax);
            previous = result.cumulative_tax_withheld;
        }

        prop_assert_eq!(monthly_sum(&summary), summary.total_withheld);
        prop_assert!(summary.year_end_adjustment() <= Decimal::ZERO);
    }

    #[test]
    fn prop_monthly_taxes_sum_to_december_cumulative_tax(
        base_salary in 0u32..4_000_000,
        raises in vec(0u32..200_000, 12),
        social_insurance in 0u32..300_000,
        special_deduction in 0u32..500_000,
    ) {
        // Each month's salary covers its own deductions, so the cumulative
        // taxable income never shrinks and nothing is over-withheld.
        let floor = social_insurance + special_deduction + 500_000;
        let salaries: Vec<u32> = raises.iter().map(|r| floor + base_salary + r).collect();

        let summary = summarize(&varying_salary_config(&salaries, social_insurance, special_deduction));

        prop_assert_eq!(monthly_sum(&summary), summary.total_tax);
        prop_assert_eq!(summary.year_end_adjustment(), Decimal::ZERO);
    }

    #[test]
    fn prop_taxable_income_is_zero_when_deductions_cover_income(
        salary in 0u32..500_000,
        social_insurance in 0u32..100_000,
    ) {
        let config = AnnualConfiguration::uniform(
            2025,
            cents(salary),
            SocialInsurance { medical: cents(social_insurance), ..Default::default() },
            SpecialDeduction::default(),
        );

        let summary = summarize(&config);

        for result in &summary.monthly_details {
            prop_assert_eq!(result.cumulative_taxable_income, Decimal::ZERO);
            prop_assert_eq!(result.cumulative_tax, Decimal::ZERO);
        }
    }
}
