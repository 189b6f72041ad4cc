//! Merges the annual defaults with a month's active override.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AnnualConfiguration, SocialInsurance, SpecialDeduction};

/// The configuration actually in force for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveMonth {
    pub month: u32,
    pub gross_salary: Decimal,
    pub social_insurance: SocialInsurance,
    pub special_deduction: SpecialDeduction,
    /// True when an active override contributed to this month.
    pub is_custom: bool,
}

/// Resolves the effective configuration for `month`.
///
/// Without an active override the annual defaults are returned as-is.
/// With one, each field takes the override's value when set and the
/// default otherwise.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use iit_core::{AnnualConfiguration, FieldOverride, MonthlyOverride};
/// use iit_core::calculations::resolve_month;
///
/// let mut config = AnnualConfiguration::uniform(
///     2025,
///     dec!(10000),
///     Default::default(),
///     Default::default(),
/// );
/// config.monthly_overrides.push(MonthlyOverride {
///     month: 3,
///     gross_salary: FieldOverride::Override(dec!(25000)),
///     use_custom: true,
///     ..Default::default()
/// });
///
/// assert_eq!(resolve_month(2, &config).gross_salary, dec!(10000));
/// assert_eq!(resolve_month(3, &config).gross_salary, dec!(25000));
/// assert!(resolve_month(3, &config).is_custom);
/// ```
pub fn resolve_month(
    month: u32,
    config: &AnnualConfiguration,
) -> EffectiveMonth {
    match config.active_override(month) {
        None => EffectiveMonth {
            month,
            gross_salary: config.gross_salary,
            social_insurance: config.social_insurance,
            special_deduction: config.special_deduction,
            is_custom: false,
        },
        Some(entry) => EffectiveMonth {
            month,
            gross_salary: entry.gross_salary.resolve(config.gross_salary),
            social_insurance: entry.social_insurance.apply(&config.social_insurance),
            special_deduction: entry.special_deduction.apply(&config.special_deduction),
            is_custom: true,
        },
    }
}
