//! Rate table and monthly exemption used by the withholding engine.
//!
//! These values are injected at engine construction time so that a change
//! in tax law only needs a new [`WithholdingRules`], never a code change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MAX_MONTHLY_AMOUNT, TaxBracket};

/// Errors raised when a rate table or threshold is structurally unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    /// No brackets were supplied.
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    /// The first bracket must start at zero.
    #[error("first bracket must start at 0, got {0}")]
    FirstBracketNotAtZero(Decimal),

    /// A bracket does not start where the previous one ended.
    #[error("bracket level {level} starts at {min_income}, expected {expected}")]
    NotContiguous {
        level: u8,
        min_income: Decimal,
        expected: Decimal,
    },

    /// A bracket's upper bound is not above its lower bound.
    #[error("bracket level {level} has max {max_income} not above min {min_income}")]
    EmptyRange {
        level: u8,
        min_income: Decimal,
        max_income: Decimal,
    },

    /// Only the final bracket may be unbounded.
    #[error("bracket level {0} is unbounded but is not the last bracket")]
    UnboundedBeforeLast(u8),

    /// The final bracket must be unbounded.
    #[error("last bracket level {0} must be unbounded")]
    BoundedLastBracket(u8),

    /// Rates are fractions in [0, 1].
    #[error("bracket level {level} has rate {rate} outside [0, 1]")]
    InvalidRate { level: u8, rate: Decimal },

    /// Quick deductions cannot be negative.
    #[error("bracket level {level} has negative quick deduction {quick_deduction}")]
    NegativeQuickDeduction { level: u8, quick_deduction: Decimal },

    /// The monthly exemption threshold cannot be negative.
    #[error("monthly threshold must be non-negative, got {0}")]
    NegativeThreshold(Decimal),

    #[error("monthly threshold {0} exceeds the monthly limit of {limit}", limit = MAX_MONTHLY_AMOUNT)]
    ThresholdTooLarge(Decimal),
}

/// Monthly exemption amount plus the cumulative (annual) rate table.
///
/// Construction through [`WithholdingRules::new`] guarantees the table is
/// non-empty, starts at zero, is contiguous and ends in an unbounded tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRules")]
pub struct WithholdingRules {
    monthly_threshold: Decimal,
    brackets: Vec<TaxBracket>,
}

#[derive(Deserialize)]
struct RawRules {
    monthly_threshold: Decimal,
    brackets: Vec<TaxBracket>,
}

impl TryFrom<RawRules> for WithholdingRules {
    type Error = RulesError;

    fn try_from(raw: RawRules) -> Result<Self, Self::Error> {
        Self::new(raw.monthly_threshold, raw.brackets)
    }
}

impl WithholdingRules {
    /// Validates and builds a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if the threshold is negative or the bracket
    /// table is empty, unordered, has gaps or overlaps, or is bounded at the top.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use iit_core::{RulesError, TaxBracket, WithholdingRules};
    ///
    /// let brackets = vec![TaxBracket {
    ///     level: 1,
    ///     min_income: dec!(0),
    ///     max_income: Some(dec!(36000)),
    ///     tax_rate: dec!(0.03),
    ///     quick_deduction: dec!(0),
    /// }];
    ///
    /// let result = WithholdingRules::new(dec!(5000), brackets);
    /// assert_eq!(result, Err(RulesError::BoundedLastBracket(1)));
    /// ```
    pub fn new(
        monthly_threshold: Decimal,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, RulesError> {
        if monthly_threshold < Decimal::ZERO {
            return Err(RulesError::NegativeThreshold(monthly_threshold));
        }
        if monthly_threshold > MAX_MONTHLY_AMOUNT {
            return Err(RulesError::ThresholdTooLarge(monthly_threshold));
        }
        validate_brackets(&brackets)?;

        Ok(Self {
            monthly_threshold,
            brackets,
        })
    }

    /// The resident comprehensive-income schedule: 5000 per month exempt,
    /// seven tiers from 3% to 45% over cumulative annual taxable income.
    pub fn comprehensive_income() -> Self {
        let tier = |level: u8, min: i64, max: Option<i64>, rate: i64, quick: i64| TaxBracket {
            level,
            min_income: Decimal::from(min),
            max_income: max.map(Decimal::from),
            tax_rate: Decimal::new(rate, 2),
            quick_deduction: Decimal::from(quick),
        };

        Self {
            monthly_threshold: Decimal::from(5000),
            brackets: vec![
                tier(1, 0, Some(36_000), 3, 0),
                tier(2, 36_000, Some(144_000), 10, 2_520),
                tier(3, 144_000, Some(300_000), 20, 16_920),
                tier(4, 300_000, Some(420_000), 25, 31_920),
                tier(5, 420_000, Some(660_000), 30, 52_920),
                tier(6, 660_000, Some(960_000), 35, 85_920),
                tier(7, 960_000, None, 45, 181_920),
            ],
        }
    }

    /// Returns a copy of these rules with a different monthly threshold.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NegativeThreshold`] or
    /// [`RulesError::ThresholdTooLarge`] for an unusable amount.
    pub fn with_monthly_threshold(
        self,
        monthly_threshold: Decimal,
    ) -> Result<Self, RulesError> {
        Self::new(monthly_threshold, self.brackets)
    }

    pub fn monthly_threshold(&self) -> Decimal {
        self.monthly_threshold
    }

    /// Brackets in ascending order; never empty.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

impl Default for WithholdingRules {
    fn default() -> Self {
        Self::comprehensive_income()
    }
}

fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), RulesError> {
    let first = brackets.first().ok_or(RulesError::NoTaxBrackets)?;
    if first.min_income != Decimal::ZERO {
        return Err(RulesError::FirstBracketNotAtZero(first.min_income));
    }

    let last_index = brackets.len() - 1;
    let mut expected_min = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
            return Err(RulesError::InvalidRate {
                level: bracket.level,
                rate: bracket.tax_rate,
            });
        }
        if bracket.quick_deduction < Decimal::ZERO {
            return Err(RulesError::NegativeQuickDeduction {
                level: bracket.level,
                quick_deduction: bracket.quick_deduction,
            });
        }
        if bracket.min_income != expected_min {
            return Err(RulesError::NotContiguous {
                level: bracket.level,
                min_income: bracket.min_income,
                expected: expected_min,
            });
        }

        match bracket.max_income {
            Some(_) if index == last_index => {
                return Err(RulesError::BoundedLastBracket(bracket.level));
            }
            Some(max) if max <= bracket.min_income => {
                return Err(RulesError::EmptyRange {
                    level: bracket.level,
                    min_income: bracket.min_income,
                    max_income: max,
                });
            }
            Some(max) => expected_min = max,
            None if index != last_index => {
                return Err(RulesError::UnboundedBeforeLast(bracket.level));
            }
            None => {}
        }
    }

    Ok(())
}
