use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{SocialInsurance, SpecialDeduction};

/// Withholding outcome for one month. Produced once by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyResult {
    pub month: u32,
    pub gross_salary: Decimal,

    pub social_insurance_total: Decimal,
    pub social_insurance_detail: SocialInsurance,
    pub special_deduction_total: Decimal,
    pub special_deduction_detail: SpecialDeduction,

    /// Monthly exemption amount in force.
    pub threshold: Decimal,

    // Year-to-date figures through this month
    pub cumulative_income: Decimal,
    pub cumulative_deduction: Decimal,
    pub cumulative_taxable_income: Decimal,
    /// Theoretical tax on the cumulative taxable income.
    pub cumulative_tax: Decimal,
    /// Tax actually withheld in months 1..=this month.
    pub cumulative_tax_withheld: Decimal,

    /// Tax withheld this month.
    pub monthly_tax: Decimal,
    pub net_salary: Decimal,

    // Bracket applied to the cumulative taxable income
    pub bracket_level: u8,
    pub tax_rate: Decimal,
    pub quick_deduction: Decimal,

    pub is_custom: bool,
}

/// Year totals derived from the twelve [`MonthlyResult`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub total_gross_salary: Decimal,
    pub total_social_insurance: Decimal,
    pub total_special_deduction: Decimal,
    pub total_threshold: Decimal,
    /// December's cumulative taxable income.
    pub total_taxable_income: Decimal,
    /// December's cumulative tax.
    pub total_tax: Decimal,
    /// Sum of the monthly withholdings.
    pub total_withheld: Decimal,
    pub total_net_salary: Decimal,
    pub monthly_details: Vec<MonthlyResult>,
}

impl AnnualSummary {
    /// Balance left for annual reconciliation.
    ///
    /// Zero when withholding tracked the cumulative tax exactly; negative when
    /// more was withheld than the year's tax, since withholding never refunds.
    pub fn year_end_adjustment(&self) -> Decimal {
        self.total_tax - self.total_withheld
    }
}
