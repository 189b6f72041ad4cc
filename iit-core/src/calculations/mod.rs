//! Cumulative withholding calculations.
//!
//! Four cooperating pieces, leaf first: bracket lookup, deduction totals,
//! per-month override resolution, and the engine that folds them over the
//! twelve months of a year.

pub mod bracket;
pub mod common;
pub mod deductions;
pub mod engine;
pub mod overrides;

pub use bracket::BracketResolver;
pub use deductions::{DeductionTotals, aggregate, social_insurance_total, special_deduction_total};
pub use engine::{CumulativeState, WithholdingEngine};
pub use overrides::{EffectiveMonth, resolve_month};
