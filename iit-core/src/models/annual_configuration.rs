use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    FieldOverride, SocialInsurance, SocialInsuranceField, SocialInsuranceOverride,
    SpecialDeduction, SpecialDeductionField, SpecialDeductionOverride,
};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Largest monthly amount [`AnnualConfiguration::validate`] accepts.
///
/// Twelve months of every field at this size, multiplied by any rate in
/// `[0, 1]`, stays far inside the range of [`Decimal`].
pub const MAX_MONTHLY_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Problems found by [`AnnualConfiguration::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("override month {0} is outside 1..=12")]
    MonthOutOfRange(u32),

    #[error("month {0} has more than one active override")]
    DuplicateActiveOverride(u32),

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("{field} exceeds the monthly limit of {limit}, got {value}", limit = MAX_MONTHLY_AMOUNT)]
    AmountTooLarge { field: String, value: Decimal },
}

/// Per-month replacement of some or all of the annual defaults.
///
/// Only takes effect while `use_custom` is set, so a month can be edited and
/// switched off without losing its values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyOverride {
    pub month: u32,
    pub gross_salary: FieldOverride<Decimal>,
    pub social_insurance: SocialInsuranceOverride,
    pub special_deduction: SpecialDeductionOverride,
    pub use_custom: bool,
}

impl MonthlyOverride {
    /// An inactive override with every field falling back to the defaults.
    pub fn empty(month: u32) -> Self {
        Self {
            month,
            ..Default::default()
        }
    }

    /// One inactive override per month, January first.
    pub fn full_year() -> Vec<Self> {
        (1..=MONTHS_PER_YEAR).map(Self::empty).collect()
    }
}

/// The caller-owned description of a tax year: defaults plus overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnualConfiguration {
    pub year: i32,
    pub gross_salary: Decimal,
    #[serde(default)]
    pub social_insurance: SocialInsurance,
    #[serde(default)]
    pub special_deduction: SpecialDeduction,
    #[serde(default)]
    pub monthly_overrides: Vec<MonthlyOverride>,
}

impl AnnualConfiguration {
    /// A year with the same salary and deductions every month.
    pub fn uniform(
        year: i32,
        gross_salary: Decimal,
        social_insurance: SocialInsurance,
        special_deduction: SpecialDeduction,
    ) -> Self {
        Self {
            year,
            gross_salary,
            social_insurance,
            special_deduction,
            monthly_overrides: Vec::new(),
        }
    }

    /// The active override for `month`, if any. The first match wins.
    pub fn active_override(
        &self,
        month: u32,
    ) -> Option<&MonthlyOverride> {
        self.monthly_overrides
            .iter()
            .find(|o| o.month == month && o.use_custom)
    }

    /// Checks the preconditions the engine relies on but does not enforce.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found: a month outside 1..=12,
    /// two active overrides for one month, or an amount that is negative or
    /// above [`MAX_MONTHLY_AMOUNT`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_amount("gross_salary", self.gross_salary)?;
        check_social_insurance("social_insurance", &self.social_insurance)?;
        check_special_deduction("special_deduction", &self.special_deduction)?;

        let mut seen_active = [false; MONTHS_PER_YEAR as usize];
        for (index, entry) in self.monthly_overrides.iter().enumerate() {
            if !(1..=MONTHS_PER_YEAR).contains(&entry.month) {
                return Err(ConfigurationError::MonthOutOfRange(entry.month));
            }
            if !entry.use_custom {
                continue;
            }

            let slot = &mut seen_active[(entry.month - 1) as usize];
            if *slot {
                return Err(ConfigurationError::DuplicateActiveOverride(entry.month));
            }
            *slot = true;

            let prefix = format!("monthly_overrides[{index}]");
            if let FieldOverride::Override(value) = entry.gross_salary {
                check_amount(&format!("{prefix}.gross_salary"), value)?;
            }
            let social = entry.social_insurance.apply(&self.social_insurance);
            check_social_insurance(&format!("{prefix}.social_insurance"), &social)?;
            let special = entry.special_deduction.apply(&self.special_deduction);
            check_special_deduction(&format!("{prefix}.special_deduction"), &special)?;
        }

        Ok(())
    }
}

fn check_amount(
    field: &str,
    value: Decimal,
) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    if value > MAX_MONTHLY_AMOUNT {
        return Err(ConfigurationError::AmountTooLarge {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn check_social_insurance(
    prefix: &str,
    values: &SocialInsurance,
) -> Result<(), ConfigurationError> {
    SocialInsuranceField::ALL.iter().try_for_each(|field| {
        check_amount(
            &format!("{prefix}.{}", field.as_str()),
            field.amount(values),
        )
    })
}

fn check_special_deduction(
    prefix: &str,
    values: &SpecialDeduction,
) -> Result<(), ConfigurationError> {
    SpecialDeductionField::ALL.iter().try_for_each(|field| {
        check_amount(
            &format!("{prefix}.{}", field.as_str()),
            field.amount(values),
        )
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn base_config() -> AnnualConfiguration {
        AnnualConfiguration::uniform(
            2025,
            dec!(10000),
            SocialInsurance::default(),
            SpecialDeduction::default(),
        )
    }

    #[test]
    fn full_year_creates_twelve_inactive_overrides() {
        let overrides = MonthlyOverride::full_year();

        assert_eq!(overrides.len(), 12);
        assert_eq!(overrides[0].month, 1);
        assert_eq!(overrides[11].month, 12);
        assert!(overrides.iter().all(|o| !o.use_custom));
    }

    #[test]
    fn active_override_ignores_inactive_entries() {
        let mut config = base_config();
        config.monthly_overrides = MonthlyOverride::full_year();
        config.monthly_overrides[2].gross_salary = FieldOverride::Override(dec!(1));

        assert_eq!(config.active_override(3), None);

        config.monthly_overrides[2].use_custom = true;
        assert_eq!(
            config.active_override(3).map(|o| o.month),
            Some(3)
        );
    }

    #[test]
    fn validate_accepts_well_formed_configuration() {
        let mut config = base_config();
        config.monthly_overrides = MonthlyOverride::full_year();

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_month_out_of_range() {
        let mut config = base_config();
        config.monthly_overrides.push(MonthlyOverride::empty(13));

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::MonthOutOfRange(13))
        );
    }

    #[test]
    fn validate_rejects_duplicate_active_override() {
        let mut config = base_config();
        for _ in 0..2 {
            config.monthly_overrides.push(MonthlyOverride {
                use_custom: true,
                ..MonthlyOverride::empty(4)
            });
        }

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::DuplicateActiveOverride(4))
        );
    }

    #[test]
    fn validate_allows_duplicate_when_only_one_is_active() {
        let mut config = base_config();
        config.monthly_overrides.push(MonthlyOverride::empty(4));
        config.monthly_overrides.push(MonthlyOverride {
            use_custom: true,
            ..MonthlyOverride::empty(4)
        });

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_names_negative_override_field_by_index() {
        let mut config = base_config();
        config.monthly_overrides.push(MonthlyOverride::empty(2));
        config.monthly_overrides.push(MonthlyOverride {
            use_custom: true,
            social_insurance: SocialInsuranceOverride {
                medical: FieldOverride::Override(dec!(-5)),
                ..Default::default()
            },
            ..MonthlyOverride::empty(7)
        });

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::NegativeAmount {
                field: "monthly_overrides[1].social_insurance.medical".to_string(),
                value: dec!(-5),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_default_salary() {
        let mut config = base_config();
        config.gross_salary = dec!(-1);

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::NegativeAmount {
                field: "gross_salary".to_string(),
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_salary_that_would_overflow() {
        let mut config = base_config();
        config.gross_salary = dec!(10000000000000000000000000000);

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::AmountTooLarge {
                field: "gross_salary".to_string(),
                value: dec!(10000000000000000000000000000),
            })
        );
    }

    #[test]
    fn validate_rejects_oversized_override_deduction() {
        let mut config = base_config();
        config.monthly_overrides.push(MonthlyOverride {
            use_custom: true,
            special_deduction: SpecialDeductionOverride {
                elderly_support: FieldOverride::Override(MAX_MONTHLY_AMOUNT + dec!(0.01)),
                ..Default::default()
            },
            ..MonthlyOverride::empty(12)
        });

        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::AmountTooLarge { field, .. })
                if field == "monthly_overrides[0].special_deduction.elderly_support"
        ));
    }

    #[test]
    fn validate_accepts_the_monthly_limit_itself() {
        let mut config = base_config();
        config.gross_salary = MAX_MONTHLY_AMOUNT;

        assert_eq!(MAX_MONTHLY_AMOUNT, dec!(1000000000000000));
        assert_eq!(config.validate(), Ok(()));
    }
}
