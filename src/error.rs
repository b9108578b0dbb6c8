//! Crate-wide error taxonomy.

/// Errors surfaced by every fallible entry point of the engine.
#[derive(Debug, thiserror::Error)]
pub enum MinasError {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("initial_training called with no rows or no classes")]
    EmptyTraining,

    #[error("clustering adaptor violated its contract: {0}")]
    AdaptorContractViolation(String),

    #[error("attempted to revive non-existent sleep index {0}")]
    StaleSleepRevive(usize),
}

pub type Result<T> = std::result::Result<T, MinasError>;
