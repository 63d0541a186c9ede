//! Deterministic dataset generation for the supplier/inventory schema.
//!
//! Stages run in order (contracts, orders, movements) against one seeded
//! random source; the result is checked for referential and temporal
//! consistency and rendered as a single SQL artifact whose unit inventory
//! balances are an aggregation query over the movement log.

pub mod checks;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;

pub use checks::{CheckContext, CheckReport, check_dataset};
pub use engine::{GenerationEngine, GenerationResult, build_dataset};
pub use errors::GenerationError;
pub use model::{Dataset, DatasetSummary, GenerateOptions, GenerationReport, Period};
pub use output::{render_sql, write_bytes_atomic};
