//! Bracket lookup over cumulative taxable income.

use rust_decimal::Decimal;

use crate::calculations::common::{non_negative, round_to_cents};
use crate::{TaxBracket, WithholdingRules};

/// Maps cumulative taxable income to its progressive bracket.
#[derive(Debug, Clone, Copy)]
pub struct BracketResolver<'a> {
    rules: &'a WithholdingRules,
}

impl<'a> BracketResolver<'a> {
    pub fn new(rules: &'a WithholdingRules) -> Self {
        Self { rules }
    }

    /// Returns the first bracket whose upper bound is at or above `income`.
    ///
    /// Negative income is treated as zero. An income that sits exactly on a
    /// boundary belongs to the lower bracket.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use iit_core::WithholdingRules;
    /// use iit_core::calculations::BracketResolver;
    ///
    /// let rules = WithholdingRules::comprehensive_income();
    /// let resolver = BracketResolver::new(&rules);
    ///
    /// assert_eq!(resolver.resolve(dec!(36000)).level, 1);
    /// assert_eq!(resolver.resolve(dec!(36000.01)).level, 2);
    /// ```
    pub fn resolve(
        &self,
        income: Decimal,
    ) -> &'a TaxBracket {
        let income = non_negative(income);
        let brackets = self.rules.brackets();

        brackets
            .iter()
            .find(|b| b.covers(income))
            // WithholdingRules guarantees a non-empty table with an unbounded top tier.
            .unwrap_or(&brackets[brackets.len() - 1])
    }

    /// Tax on a cumulative taxable income, with the bracket that produced it.
    ///
    /// `income × rate − quick deduction`, rounded to cents and never negative.
    pub fn cumulative_tax(
        &self,
        taxable_income: Decimal,
    ) -> (Decimal, &'a TaxBracket) {
        let bracket = self.resolve(taxable_income);
        if taxable_income <= Decimal::ZERO {
            return (Decimal::ZERO, bracket);
        }

        let tax = taxable_income * bracket.tax_rate - bracket.quick_deduction;
        (non_negative(round_to_cents(tax)), bracket)
    }
}
