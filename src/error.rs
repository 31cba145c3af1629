use thiserror::Error;

pub type SwarmResult<T> = Result<T, SwarmError>;

/// Failure produced by an objective for a single position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectiveError {
    #[error("position outside objective domain: {0}")]
    OutOfDomain(String),

    #[error("expected a {expected}-dimensional position, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by swarm construction and runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwarmError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid bounds for dimension {dimension}: [{lower}, {upper}]")]
    InvalidBounds {
        dimension: usize,
        lower: f64,
        upper: f64,
    },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("objective failed at iteration {iteration} for particle {particle}: {source}")]
    Objective {
        iteration: usize,
        particle: usize,
        #[source]
        source: ObjectiveError,
    },

    #[error("interrupted by callback: {0}")]
    Interrupted(String),

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
