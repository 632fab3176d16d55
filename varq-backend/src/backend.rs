//! Core backend trait
//!
//! A backend is anything that can perform a sampling measurement of a
//! bound circuit: a local simulator, a cloud service, or a composition of
//! either. The circuit representation stays external: each backend names
//! the circuit type it consumes through an associated type.

use crate::error::{BackendError, Result};
use crate::job::SamplingJob;

/// A quantum computing backend that can perform a sampling measurement
///
/// # Contract
///
/// - `circuit` must be fully bound: no free symbolic parameters remain.
/// - The backend borrows the circuit immutably and must not alter it.
/// - `n_shots` must be positive; implementations reject zero with
///   [`BackendError::InvalidShotCount`] before submitting anything
///   (see [`ensure_positive_shots`]).
/// - The returned handle satisfies the [`SamplingJob`] contract; any retry
///   policy lives inside the concrete backend, never in callers.
///
/// # Example
///
/// ```no_run
/// use varq_backend::{Result, SamplingBackend, SamplingJob, SamplingResult};
///
/// fn run_once<B: SamplingBackend>(backend: &B, circuit: &B::Circuit) -> Result<f64> {
///     let job = backend.sample(circuit, 1000)?;
///     Ok(job.result()?.counts().values().sum())
/// }
/// ```
pub trait SamplingBackend: Send + Sync {
    /// The circuit representation this backend executes
    type Circuit;

    /// Perform a sampling measurement of a circuit
    fn sample(&self, circuit: &Self::Circuit, n_shots: usize) -> Result<Box<dyn SamplingJob>>;
}

/// Validate a requested shot count before submission
///
/// # Errors
/// Fails with [`BackendError::InvalidShotCount`] when `n_shots` is zero.
pub fn ensure_positive_shots(n_shots: usize) -> Result<()> {
    if n_shots == 0 {
        return Err(BackendError::InvalidShotCount(n_shots));
    }
    Ok(())
}
