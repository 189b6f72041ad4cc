use std::fs::File;
use std::io::Read;
use std::path::Path;

use iit_core::{RulesError, TaxBracket, WithholdingRules};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error)]
pub enum BracketLoadError {
    #[error("cannot open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid bracket table: {0}")]
    Rules(#[from] RulesError),
}

impl From<csv::Error> for BracketLoadError {
    fn from(err: csv::Error) -> Self {
        BracketLoadError::CsvParse(err.to_string())
    }
}

/// A single row of the bracket table CSV.
///
/// - `level`: 1-based tier number
/// - `min_income`: lower bound of cumulative annual taxable income
/// - `max_income`: upper bound, inclusive; a blank cell marks the open top tier
/// - `rate`: marginal rate as a fraction (e.g. 0.03 for 3%)
/// - `quick_deduction`: amount subtracted after applying the rate
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub level: u8,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub quick_deduction: Decimal,
}

impl From<BracketRecord> for TaxBracket {
    fn from(record: BracketRecord) -> Self {
        TaxBracket {
            level: record.level,
            min_income: record.min_income,
            max_income: record.max_income,
            tax_rate: record.rate,
            quick_deduction: record.quick_deduction,
        }
    }
}

/// Loader for rate tables kept in CSV files.
///
/// Rows are taken in file order; [`WithholdingRules::new`] rejects a table
/// that is not ascending and contiguous.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from any CSV reader.
    ///
    /// Cells are trimmed, so a whitespace-only `max_income` is unbounded.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoadError> {
        let records = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .deserialize()
            .collect::<Result<Vec<BracketRecord>, _>>()?;

        debug!(count = records.len(), "parsed bracket records");
        Ok(records)
    }

    /// Build validated rules from parsed records and a monthly threshold.
    pub fn into_rules(
        records: Vec<BracketRecord>,
        monthly_threshold: Decimal,
    ) -> Result<WithholdingRules, BracketLoadError> {
        let brackets = records.into_iter().map(TaxBracket::from).collect();
        Ok(WithholdingRules::new(monthly_threshold, brackets)?)
    }

    /// Read, parse and validate a bracket table file.
    pub fn load_from_file(
        path: &Path,
        monthly_threshold: Decimal,
    ) -> Result<WithholdingRules, BracketLoadError> {
        let file = File::open(path).map_err(|source| BracketLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::into_rules(Self::parse(file)?, monthly_threshold)
    }
}
