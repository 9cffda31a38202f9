/// Errors produced while configuring or driving the optimizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Returned when the population cannot host a binary tournament.
    #[error("population_size must be at least 2, got {size}")]
    PopulationTooSmall {
        /// The configured population size.
        size: usize,
    },

    /// Returned when the generation limit is zero.
    #[error("max_generations must be at least 1")]
    ZeroGenerations,

    /// Returned when the BLX blend factor is negative or not finite.
    #[error("invalid blend factor: {0} must be finite and non-negative")]
    InvalidBlendFactor(f64),

    /// Returned when the mutation perturbation range is inverted or not finite.
    #[error("invalid mutation range: lower ({lower}) must be less than or equal to upper ({upper})")]
    InvalidMutationRange {
        /// Lower end of the perturbation range.
        lower: f64,
        /// Upper end of the perturbation range.
        upper: f64,
    },

    /// Returned when the per-gene mutation probability is outside `[0, 1]`.
    #[error("invalid mutation probability: {0} must be in [0.0, 1.0]")]
    InvalidMutationProbability(f64),

    /// Returned when the problem declares zero decision variables.
    #[error("problem must have at least one decision variable")]
    EmptyDecisionSpace,

    /// Returned when the problem declares zero objectives.
    #[error("problem must have at least one objective")]
    NoObjectives,

    /// Returned when a box constraint has `lower > upper`, a non-finite bound,
    /// or a width that overflows.
    #[error("invalid constraint for dimension {index}: lower ({lower}) must be less than or equal to upper ({upper})")]
    InvalidConstraint {
        /// The decision dimension.
        index: usize,
        /// The lower bound.
        lower: f64,
        /// The upper bound.
        upper: f64,
    },

    /// Returned when the problem keeps producing malformed objective vectors.
    #[error("objective evaluation failed {attempts} consecutive times")]
    EvaluationFailed {
        /// Number of consecutive rejected evaluations.
        attempts: usize,
    },

    /// Returned when an engine operation is called in the wrong state.
    #[error("invalid engine state: expected {expected}, found {actual}")]
    InvalidState {
        /// The state(s) the operation requires.
        expected: &'static str,
        /// The state the engine was in.
        actual: String,
    },
}

/// A convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
