use thiserror::Error;

/// Core error type shared across stockseed crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The reference catalog violates internal invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    /// No eligible supplier could be resolved for a (unit, material) pair.
    #[error("no eligible supplier for unit {unit_id}, material {material_id}: {reason}")]
    Eligibility {
        unit_id: i64,
        material_id: i64,
        reason: String,
    },
}

/// Convenience alias for results returned by stockseed crates.
pub type Result<T> = std::result::Result<T, Error>;
