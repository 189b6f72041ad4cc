mod annual_configuration;
mod field_override;
mod social_insurance;
mod special_deduction;
mod tax_bracket;
mod withholding_result;
mod withholding_rules;

pub use annual_configuration::{
    AnnualConfiguration, ConfigurationError, MAX_MONTHLY_AMOUNT, MONTHS_PER_YEAR, MonthlyOverride,
};
pub use field_override::FieldOverride;
pub use social_insurance::{SocialInsurance, SocialInsuranceField, SocialInsuranceOverride};
pub use special_deduction::{SpecialDeduction, SpecialDeductionField, SpecialDeductionOverride};
pub use tax_bracket::TaxBracket;
pub use withholding_result::{AnnualSummary, MonthlyResult};
pub use withholding_rules::{RulesError, WithholdingRules};
