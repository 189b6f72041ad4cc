use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FieldOverride;

/// Itemized special additional deductions claimed per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialDeduction {
    pub housing_loan: Decimal,
    pub child_care: Decimal,
    pub child_education: Decimal,
    pub continuing_education: Decimal,
    pub serious_illness: Decimal,
    pub housing_rent: Decimal,
    pub elderly_support: Decimal,
}

/// Partial replacement of [`SpecialDeduction`] for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialDeductionOverride {
    pub housing_loan: FieldOverride<Decimal>,
    pub child_care: FieldOverride<Decimal>,
    pub child_education: FieldOverride<Decimal>,
    pub continuing_education: FieldOverride<Decimal>,
    pub serious_illness: FieldOverride<Decimal>,
    pub housing_rent: FieldOverride<Decimal>,
    pub elderly_support: FieldOverride<Decimal>,
}

impl SpecialDeductionOverride {
    /// Merges field by field: overridden fields win, the rest keep `defaults`.
    pub fn apply(
        &self,
        defaults: &SpecialDeduction,
    ) -> SpecialDeduction {
        SpecialDeduction {
            housing_loan: self.housing_loan.resolve(defaults.housing_loan),
            child_care: self.child_care.resolve(defaults.child_care),
            child_education: self.child_education.resolve(defaults.child_education),
            continuing_education: self
                .continuing_education
                .resolve(defaults.continuing_education),
            serious_illness: self.serious_illness.resolve(defaults.serious_illness),
            housing_rent: self.housing_rent.resolve(defaults.housing_rent),
            elderly_support: self.elderly_support.resolve(defaults.elderly_support),
        }
    }
}

/// Names the fields of [`SpecialDeduction`] for labelling and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialDeductionField {
    HousingLoan,
    ChildCare,
    ChildEducation,
    ContinuingEducation,
    SeriousIllness,
    HousingRent,
    ElderlySupport,
}

impl SpecialDeductionField {
    pub const ALL: [Self; 7] = [
        Self::HousingLoan,
        Self::ChildCare,
        Self::ChildEducation,
        Self::ContinuingEducation,
        Self::SeriousIllness,
        Self::HousingRent,
        Self::ElderlySupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HousingLoan => "housing_loan",
            Self::ChildCare => "child_care",
            Self::ChildEducation => "child_education",
            Self::ContinuingEducation => "continuing_education",
            Self::SeriousIllness => "serious_illness",
            Self::HousingRent => "housing_rent",
            Self::ElderlySupport => "elderly_support",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HousingLoan => "Housing loan interest",
            Self::ChildCare => "Infant care (under 3)",
            Self::ChildEducation => "Child education",
            Self::ContinuingEducation => "Continuing education",
            Self::SeriousIllness => "Serious illness medical",
            Self::HousingRent => "Housing rent",
            Self::ElderlySupport => "Elderly support",
        }
    }

    /// Statutory monthly cap, as shown next to the input field.
    pub fn limit_note(&self) -> &'static str {
        match self {
            Self::HousingLoan => "1000 per month",
            Self::ChildCare => "2000 per child per month",
            Self::ChildEducation => "2000 per child per month",
            Self::ContinuingEducation => "400 per month for degree education",
            Self::SeriousIllness => "actual amount per year, capped at 80000",
            Self::HousingRent => "800 to 1500 per month depending on city",
            Self::ElderlySupport => "3000 per month for an only child",
        }
    }

    pub fn amount(
        &self,
        values: &SpecialDeduction,
    ) -> Decimal {
        match self {
            Self::HousingLoan => values.housing_loan,
            Self::ChildCare => values.child_care,
            Self::ChildEducation => values.child_education,
            Self::ContinuingEducation => values.continuing_education,
            Self::SeriousIllness => values.serious_illness,
            Self::HousingRent => values.housing_rent,
            Self::ElderlySupport => values.elderly_support,
        }
    }
}
