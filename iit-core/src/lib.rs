pub mod calculations;
pub mod models;

pub use calculations::WithholdingEngine;
pub use models::*;
