use thiserror::Error;

/// Simplified `Result` using [`EstimatorError`] as error type
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Error variants from hyperparameter construction or model estimation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("invalid regularization {0}")]
    InvalidRegularization(f32),
    #[error("invalid tolerance {0}")]
    InvalidTolerance(f32),
    #[error("invalid maximum number of iterations {0}")]
    InvalidMaxIterations(usize),
    /// The dataset has no sample
    #[error("empty dataset")]
    EmptyDataset,
    #[error("design matrix has {n_samples} samples but targets have {n_targets}")]
    ShapeMismatch { n_samples: usize, n_targets: usize },
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
    #[error("warm start has {got} coefficients, expected {expected}")]
    WarmStartMismatch { got: usize, expected: usize },
    #[error("singular linear system")]
    SingularSystem,
    /// The solver hit its iteration cap. The fitted coefficients are still
    /// available but may be far from the optimum.
    #[error("did not converge after {n_iterations} iterations (max change {max_change})")]
    DidNotConverge { n_iterations: usize, max_change: f32 },
}

impl EstimatorError {
    /// Returns `true` for errors caused by malformed hyperparameters or data.
    /// These are fatal: the fit cannot proceed until the input is fixed.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(
            self,
            EstimatorError::DidNotConverge { .. } | EstimatorError::SingularSystem
        )
    }
}
