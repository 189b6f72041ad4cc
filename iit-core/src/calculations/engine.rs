//! Cumulative (year-to-date) withholding over a twelve-month year.
//!
//! # Monthly steps
//!
//! For month `m`, with the effective configuration for that month:
//!
//! | Step | Quantity |
//! |------|----------|
//! | 1    | cumulative income = previous cumulative income + gross salary |
//! | 2    | cumulative social insurance = previous + this month's total |
//! | 3    | cumulative special deduction = this month's total × m |
//! | 4    | cumulative threshold = monthly threshold × m |
//! | 5    | cumulative deduction = step 2 + step 3 + step 4 |
//! | 6    | cumulative taxable income = max(0, step 1 − step 5) |
//! | 7    | cumulative tax = max(0, step 6 × rate − quick deduction), to cents |
//! | 8    | monthly tax = max(0, step 7 − tax actually withheld so far), to cents |
//! | 9    | net salary = gross − social insurance − monthly tax, to cents |
//!
//! Step 3 rebuilds the special deduction as if this month's amount had been
//! claimed since January, so a deduction declared mid-year catches up on the
//! months it missed.
//!
//! Step 8 subtracts what was actually withheld, not the previous month's
//! theoretical tax. Withholding is never negative, so once more has been
//! withheld than the cumulative tax requires the excess stays withheld until
//! annual reconciliation (see [`AnnualSummary::year_end_adjustment`]).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use iit_core::{AnnualConfiguration, WithholdingRules};
//! use iit_core::calculations::WithholdingEngine;
//!
//! let config = AnnualConfiguration::uniform(
//!     2025,
//!     dec!(10000),
//!     Default::default(),
//!     Default::default(),
//! );
//!
//! let engine = WithholdingEngine::new(WithholdingRules::comprehensive_income());
//! let summary = engine.compute_annual_summary(&config);
//!
//! assert_eq!(summary.monthly_details[0].monthly_tax, dec!(150.00));
//! assert_eq!(summary.monthly_details[0].net_salary, dec!(9850.00));
//! assert_eq!(summary.total_tax, dec!(3480.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, round_to_cents, sum_exact};
use crate::calculations::{BracketResolver, EffectiveMonth, aggregate, resolve_month};
use crate::{AnnualConfiguration, AnnualSummary, MONTHS_PER_YEAR, MonthlyResult, WithholdingRules};

/// Running totals carried from one month into the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CumulativeState {
    pub cumulative_income: Decimal,
    pub cumulative_social_insurance: Decimal,
    pub cumulative_tax_withheld: Decimal,
}

/// Computes monthly withholding and the annual summary for a configuration.
#[derive(Debug, Clone, Default)]
pub struct WithholdingEngine {
    rules: WithholdingRules,
}

impl WithholdingEngine {
    pub fn new(rules: WithholdingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &WithholdingRules {
        &self.rules
    }

    /// Advances the cumulative state by one month.
    ///
    /// Pure: the same state and month always give the same result. Months
    /// must be fed in order, each with the state returned by the previous call.
    pub fn step(
        &self,
        state: &CumulativeState,
        month: &EffectiveMonth,
    ) -> (MonthlyResult, CumulativeState) {
        let totals = aggregate(month);
        let month_count = Decimal::from(month.month);
        let threshold = self.rules.monthly_threshold();

        let cumulative_income = state.cumulative_income + month.gross_salary;
        let cumulative_social_insurance =
            state.cumulative_social_insurance + totals.social_insurance;
        let cumulative_special_deduction = totals.special_deduction * month_count;
        let cumulative_threshold = threshold * month_count;

        let cumulative_deduction =
            cumulative_social_insurance + cumulative_special_deduction + cumulative_threshold;
        let cumulative_taxable_income = non_negative(cumulative_income - cumulative_deduction);

        let (cumulative_tax, bracket) =
            BracketResolver::new(&self.rules).cumulative_tax(cumulative_taxable_income);

        let due = round_to_cents(cumulative_tax - state.cumulative_tax_withheld);
        if due < Decimal::ZERO {
            warn!(
                month = month.month,
                cumulative_tax = %cumulative_tax,
                already_withheld = %state.cumulative_tax_withheld,
                "cumulative tax below amount already withheld; nothing withheld this month"
            );
        }
        let monthly_tax = non_negative(due);
        let net_salary = round_to_cents(month.gross_salary - totals.social_insurance - monthly_tax);
        let cumulative_tax_withheld = state.cumulative_tax_withheld + monthly_tax;

        debug!(
            month = month.month,
            is_custom = month.is_custom,
            cumulative_taxable_income = %cumulative_taxable_income,
            bracket = bracket.level,
            cumulative_tax = %cumulative_tax,
            monthly_tax = %monthly_tax,
            "computed monthly withholding"
        );

        let result = MonthlyResult {
            month: month.month,
            gross_salary: month.gross_salary,
            social_insurance_total: totals.social_insurance,
            social_insurance_detail: month.social_insurance,
            special_deduction_total: totals.special_deduction,
            special_deduction_detail: month.special_deduction,
            threshold,
            cumulative_income,
            cumulative_deduction,
            cumulative_taxable_income,
            cumulative_tax,
            cumulative_tax_withheld,
            monthly_tax,
            net_salary,
            bracket_level: bracket.level,
            tax_rate: bracket.tax_rate,
            quick_deduction: bracket.quick_deduction,
            is_custom: month.is_custom,
        };

        let next = CumulativeState {
            cumulative_income,
            cumulative_social_insurance,
            cumulative_tax_withheld,
        };

        (result, next)
    }

    /// Runs January through December and summarizes the year.
    ///
    /// The configuration is assumed to be well formed; see
    /// [`AnnualConfiguration::validate`] for an opt-in check. Amounts above
    /// [`crate::MAX_MONTHLY_AMOUNT`] can overflow the cumulative totals.
    pub fn compute_annual_summary(
        &self,
        config: &AnnualConfiguration,
    ) -> AnnualSummary {
        let (state, monthly_details) = (1..=MONTHS_PER_YEAR).fold(
            (
                CumulativeState::default(),
                Vec::with_capacity(MONTHS_PER_YEAR as usize),
            ),
            |(state, mut details), month| {
                let (result, next) = self.step(&state, &resolve_month(month, config));
                details.push(result);
                (next, details)
            },
        );

        let summary = self.summarize(config.year, state, monthly_details);
        debug!(
            year = summary.year,
            total_tax = %summary.total_tax,
            total_withheld = %summary.total_withheld,
            "computed annual summary"
        );
        summary
    }

    fn summarize(
        &self,
        year: i32,
        state: CumulativeState,
        monthly_details: Vec<MonthlyResult>,
    ) -> AnnualSummary {
        let total_of = |field: fn(&MonthlyResult) -> Decimal| {
            sum_exact(monthly_details.iter().map(field))
        };
        let december = monthly_details.last();

        AnnualSummary {
            year,
            total_gross_salary: total_of(|r| r.gross_salary),
            total_social_insurance: total_of(|r| r.social_insurance_total),
            total_special_deduction: total_of(|r| r.special_deduction_total),
            total_threshold: self.rules.monthly_threshold() * Decimal::from(MONTHS_PER_YEAR),
            total_taxable_income: december
                .map_or(Decimal::ZERO, |r| r.cumulative_taxable_income),
            total_tax: december.map_or(Decimal::ZERO, |r| r.cumulative_tax),
            total_withheld: state.cumulative_tax_withheld,
            total_net_salary: total_of(|r| r.net_salary),
            monthly_details,
        }
    }
}
