//! Totals of the itemized pre-tax deductions for a month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::EffectiveMonth;
use crate::calculations::common::sum_exact;
use crate::{SocialInsurance, SocialInsuranceField, SpecialDeduction, SpecialDeductionField};

/// Scalar deduction totals for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeductionTotals {
    pub social_insurance: Decimal,
    pub special_deduction: Decimal,
}

/// Sum of the four social-insurance and housing-fund contributions.
pub fn social_insurance_total(values: &SocialInsurance) -> Decimal {
    sum_exact(SocialInsuranceField::ALL.iter().map(|f| f.amount(values)))
}

/// Sum of the seven special additional deductions.
pub fn special_deduction_total(values: &SpecialDeduction) -> Decimal {
    sum_exact(SpecialDeductionField::ALL.iter().map(|f| f.amount(values)))
}

pub fn aggregate(month: &EffectiveMonth) -> DeductionTotals {
    DeductionTotals {
        social_insurance: social_insurance_total(&month.social_insurance),
        special_deduction: special_deduction_total(&month.special_deduction),
    }
}
