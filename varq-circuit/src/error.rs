//! Error types for parameter mappings

use thiserror::Error;

/// Result type for parameter mapping operations
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Errors that can occur when building or evaluating parameter mappings
#[derive(Debug, Error)]
pub enum CircuitError {
    /// Input vector length differs from the declared free-parameter count
    #[error("Expected {expected} parameter values, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// Raw parameter slot index out of range
    #[error("Invalid raw parameter slot {slot}: mapping has only {num_slots} slots")]
    InvalidSlot { slot: usize, num_slots: usize },

    /// A slot expression references a parameter the mapping never declared
    #[error("Undeclared parameter {index}: mapping declares {num_parameters} parameters")]
    UndeclaredParameter { index: usize, num_parameters: usize },
}
