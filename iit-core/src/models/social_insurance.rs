use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FieldOverride;

/// Monthly social-insurance and housing-fund contributions withheld before tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialInsurance {
    pub pension: Decimal,
    pub unemployment: Decimal,
    pub medical: Decimal,
    pub housing_fund: Decimal,
}

/// Partial replacement of [`SocialInsurance`] for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialInsuranceOverride {
    pub pension: FieldOverride<Decimal>,
    pub unemployment: FieldOverride<Decimal>,
    pub medical: FieldOverride<Decimal>,
    pub housing_fund: FieldOverride<Decimal>,
}

impl SocialInsuranceOverride {
    /// Merges field by field: overridden fields win, the rest keep `defaults`.
    pub fn apply(
        &self,
        defaults: &SocialInsurance,
    ) -> SocialInsurance {
        SocialInsurance {
            pension: self.pension.resolve(defaults.pension),
            unemployment: self.unemployment.resolve(defaults.unemployment),
            medical: self.medical.resolve(defaults.medical),
            housing_fund: self.housing_fund.resolve(defaults.housing_fund),
        }
    }
}

/// Names the fields of [`SocialInsurance`] for labelling and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialInsuranceField {
    Pension,
    Unemployment,
    Medical,
    HousingFund,
}

impl SocialInsuranceField {
    pub const ALL: [Self; 4] = [
        Self::Pension,
        Self::Unemployment,
        Self::Medical,
        Self::HousingFund,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pension => "pension",
            Self::Unemployment => "unemployment",
            Self::Medical => "medical",
            Self::HousingFund => "housing_fund",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pension => "Pension insurance",
            Self::Unemployment => "Unemployment insurance",
            Self::Medical => "Medical insurance",
            Self::HousingFund => "Housing provident fund",
        }
    }

    pub fn amount(
        &self,
        values: &SocialInsurance,
    ) -> Decimal {
        match self {
            Self::Pension => values.pension,
            Self::Unemployment => values.unemployment,
            Self::Medical => values.medical,
            Self::HousingFund => values.housing_fund,
        }
    }
}
