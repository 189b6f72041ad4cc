//! TOML loader for annual withholding configurations.
//!
//! ## File format
//!
//! Amounts may be written as TOML integers or as quoted decimals; quoted
//! strings keep every digit exactly. Deduction fields that are left out are
//! zero; override fields that are left out fall back to the annual default.
//!
//! ```toml
//! year = 2025
//! gross_salary = "20000"
//!
//! [social_insurance]
//! pension = "1600"
//! medical = "400"
//!
//! [special_deduction]
//! child_education = "2000"
//!
//! [[monthly_overrides]]
//! month = 6
//! use_custom = true
//! gross_salary = "30000"
//! special_deduction = { elderly_support = "3000" }
//!
//! [rules]
//! monthly_threshold = "5000"
//! ```
//!
//! The optional `[rules]` table only replaces the monthly threshold; bracket
//! tables are loaded separately by [`crate::bracket_loader`].

use std::fs;
use std::path::Path;

use iit_core::{AnnualConfiguration, ConfigurationError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// A configuration plus any rule adjustments carried in the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfiguration {
    pub configuration: AnnualConfiguration,
    pub monthly_threshold: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct RulesSection {
    monthly_threshold: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct RulesOnly {
    #[serde(default)]
    rules: RulesSection,
}

/// Parse and validate a configuration from TOML text.
pub fn parse(text: &str) -> Result<LoadedConfiguration, ConfigLoadError> {
    let configuration: AnnualConfiguration = toml::from_str(text)?;
    let RulesOnly { rules } = toml::from_str(text)?;

    configuration.validate()?;
    debug!(
        year = configuration.year,
        overrides = configuration.monthly_overrides.len(),
        "loaded annual configuration"
    );

    Ok(LoadedConfiguration {
        configuration,
        monthly_threshold: rules.monthly_threshold,
    })
}

/// Read, parse and validate a configuration file.
pub fn load_from_file(path: &Path) -> Result<LoadedConfiguration, ConfigLoadError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse(&text)
}

#[cfg(test)]
mod tests {
    use iit_core::FieldOverride;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_minimal_configuration() {
        let loaded = parse("year = 2025\ngross_salary = 10000\n").unwrap();

        assert_eq!(
            loaded.configuration,
            AnnualConfiguration::uniform(
                2025,
                dec!(10000),
                Default::default(),
                Default::default()
            )
        );
        assert_eq!(loaded.monthly_threshold, None);
    }

    #[test]
    fn parse_quoted_decimals_exactly() {
        let text = r#"
year = 2025
gross_salary = "15000.55"

[social_insurance]
pension = "1200.04"
"#;

        let loaded = parse(text).unwrap();

        assert_eq!(loaded.configuration.gross_salary, dec!(15000.55));
        assert_eq!(loaded.configuration.social_insurance.pension, dec!(1200.04));
        assert_eq!(loaded.configuration.social_insurance.medical, dec!(0));
    }

    #[test]
    fn parse_partial_override() {
        let text = r#"
year = 2025
gross_salary = "20000"

[special_deduction]
housing_rent = "1500"

[[monthly_overrides]]
month = 6
use_custom = true
special_deduction = { child_education = "2000" }
"#;

        let loaded = parse(text).unwrap();
        let entry = &loaded.configuration.monthly_overrides[0];

        assert_eq!(entry.month, 6);
        assert!(entry.use_custom);
        assert_eq!(entry.gross_salary, FieldOverride::Default);
        assert_eq!(
            entry.special_deduction.child_education,
            FieldOverride::Override(dec!(2000))
        );
        assert_eq!(entry.special_deduction.housing_rent, FieldOverride::Default);
    }

    #[test]
    fn parse_rules_threshold() {
        let text = "year = 2025\ngross_salary = 1\n[rules]\nmonthly_threshold = \"6000\"\n";

        let loaded = parse(text).unwrap();

        assert_eq!(loaded.monthly_threshold, Some(dec!(6000)));
    }

    #[test]
    fn parse_rejects_duplicate_active_months() {
        let text = r#"
year = 2025
gross_salary = "20000"

[[monthly_overrides]]
month = 3
use_custom = true

[[monthly_overrides]]
month = 3
use_custom = true
"#;

        let result = parse(text);

        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(
                ConfigurationError::DuplicateActiveOverride(3)
            ))
        ));
    }

    #[test]
    fn parse_rejects_salary_too_large_to_compute() {
        let result = parse("year = 2025\ngross_salary = \"10000000000000000000000000000\"\n");

        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(ConfigurationError::AmountTooLarge { .. }))
        ));
    }

    #[test]
    fn parse_rejects_missing_salary() {
        assert!(matches!(
            parse("year = 2025\n"),
            Err(ConfigLoadError::Parse(_))
        ));
    }

    #[test]
    fn load_from_missing_file_reports_path() {
        let err = load_from_file(Path::new("definitely/not/here.toml")).unwrap_err();

        assert!(err.to_string().contains("definitely/not/here.toml"));
    }
}
