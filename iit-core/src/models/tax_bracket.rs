use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of the progressive rate table applied to cumulative taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub level: u8,
    pub min_income: Decimal,
    /// Upper bound (inclusive). `None` marks the unbounded top tier.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub quick_deduction: Decimal,
}

impl TaxBracket {
    /// Whether `income` falls at or below this tier's upper bound.
    pub fn covers(
        &self,
        income: Decimal,
    ) -> bool {
        self.max_income.is_none_or(|max| income <= max)
    }
}
