use thiserror::Error;

use crate::model::GenerationReport;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error(transparent)]
    Core(#[from] stockseed_core::Error),
    #[error("inconsistent dataset: {0}")]
    Inconsistent(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("generation failed with {} check violation(s)", .0.violations.len())]
    Failed(Box<GenerationReport>),
}
