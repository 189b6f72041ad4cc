//! File formats and presentation around the `iit-core` withholding engine.
//!
//! - [`config_loader`] reads an [`iit_core::AnnualConfiguration`] from TOML.
//! - [`bracket_loader`] reads a rate table from CSV.
//! - [`report`] renders an [`iit_core::AnnualSummary`] as a table or CSV.

pub mod bracket_loader;
pub mod calendar;
pub mod config_loader;
pub mod report;

pub use bracket_loader::{BracketLoadError, BracketRecord, BracketTableLoader};
pub use calendar::{current_year, year_options};
pub use config_loader::{ConfigLoadError, LoadedConfiguration};
