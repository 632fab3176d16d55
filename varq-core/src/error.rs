//! Error types for estimation and sampling

use thiserror::Error;
use varq_backend::BackendError;
use varq_circuit::CircuitError;

/// Result type for estimation and sampling operations
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Errors that can occur while estimating expectation values
///
/// Every variant surfaces to the immediate caller; nothing is caught or
/// suppressed internally, and no derivative value is ever guessed on
/// partial failure.
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Parameter mapping failure (length mismatch, invalid slot)
    #[error(transparent)]
    Circuit(#[from] CircuitError),

    /// The state's parametric structure cannot be differentiated exactly
    #[error("Unsupported state: {0}")]
    UnsupportedState(String),

    /// The injected estimator broke its one-estimate-per-vector contract
    #[error("Estimator returned {actual} estimates for {expected} parameter vectors")]
    EstimateCountMismatch { expected: usize, actual: usize },

    /// A sampling operation was requested with zero shots
    #[error("Invalid shot count {0}: must be positive")]
    InvalidShotCount(usize),

    /// A state vector whose length is not a power of two
    #[error("State vector length {0} is not a power of two")]
    InvalidStateVector(usize),

    /// Measurement probabilities that do not sum to one
    #[error("Probabilities sum to {0}, expected 1 within tolerance")]
    ProbabilitiesNotNormalized(f64),

    /// Unknown Pauli character in an operator description
    #[error("Invalid Pauli character '{0}'")]
    InvalidPauli(char),

    /// Pauli/qubit lists of different lengths
    #[error("Pauli string has {paulis} operators for {qubits} qubits")]
    PauliQubitMismatch { paulis: usize, qubits: usize },

    /// The same qubit named twice in one Pauli string
    #[error("Duplicate qubit {0} in Pauli string")]
    DuplicatePauliQubit(usize),

    /// Failure at or below the execution boundary, propagated verbatim
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_error_converts() {
        let circuit_err = CircuitError::ParameterCountMismatch {
            expected: 2,
            actual: 3,
        };
        let err: EstimatorError = circuit_err.into();
        assert!(format!("{}", err).contains("Expected 2"));
    }

    #[test]
    fn test_backend_error_converts_verbatim() {
        let backend_err = BackendError::Unavailable("maintenance".to_string());
        let err: EstimatorError = backend_err.into();
        assert_eq!(format!("{}", err), "Backend not available: maintenance");
    }
}
