//! Sampling measurements and their helpers
//!
//! Bridges the estimation layer to the [`varq_backend`] execution
//! abstraction: counts produced by sampling a state vector directly, and
//! adapters that sample circuits through any [`SamplingBackend`].
//!
//! Randomness is always explicit: samplers take a caller-supplied
//! [`rand::Rng`], never a process-wide source, so runs are reproducible
//! from a seed.

pub mod shots_allocator;

use num_complex::Complex64;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use varq_backend::{SamplingBackend, SamplingCounts, SamplingJob};

use crate::error::{EstimatorError, Result};

pub use shots_allocator::{
    EquipartitionShotsAllocator, PauliSamplingSetting, PauliShotsAllocator,
    ProportionalShotsAllocator, WeightedRandomShotsAllocator, WeightedShotsAllocator,
};

/// Count statistics of repeated measurements of a quantum circuit
///
/// Keys are observed bit patterns encoded in integers; values are counts
/// of observation or the probability mass of the corresponding patterns.
pub type MeasurementCounts = SamplingCounts;

const NORM_TOLERANCE: f64 = 1e-8;

fn basis_probabilities(state_vector: &[Complex64]) -> Result<Vec<f64>> {
    let len = state_vector.len();
    if len == 0 || !len.is_power_of_two() {
        return Err(EstimatorError::InvalidStateVector(len));
    }
    let probabilities: Vec<f64> = state_vector.iter().map(|amp| amp.norm_sqr()).collect();
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > NORM_TOLERANCE {
        return Err(EstimatorError::ProbabilitiesNotNormalized(total));
    }
    Ok(probabilities)
}

/// Perform sampling from a state vector
///
/// Draws `n_shots` outcomes from the measurement distribution of the
/// amplitudes and returns integer counts (as `f64` masses). The state
/// vector length must be a power of two and its norm must be 1 within
/// tolerance.
///
/// # Errors
/// [`EstimatorError::InvalidShotCount`] for zero shots,
/// [`EstimatorError::InvalidStateVector`] for a bad length, and
/// [`EstimatorError::ProbabilitiesNotNormalized`] for an unnormalized
/// vector.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use varq_core::sampling::sample_from_state_vector;
///
/// let plus = [
///     Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0),
///     Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0),
/// ];
/// let mut rng = StdRng::seed_from_u64(7);
/// let counts = sample_from_state_vector(&plus, 1000, &mut rng).unwrap();
/// assert_eq!(counts.values().sum::<f64>(), 1000.0);
/// ```
pub fn sample_from_state_vector(
    state_vector: &[Complex64],
    n_shots: usize,
    rng: &mut impl Rng,
) -> Result<MeasurementCounts> {
    if n_shots == 0 {
        return Err(EstimatorError::InvalidShotCount(n_shots));
    }
    let probabilities = basis_probabilities(state_vector)?;
    let distribution = WeightedIndex::new(&probabilities)
        .map_err(|_| EstimatorError::ProbabilitiesNotNormalized(probabilities.iter().sum()))?;

    let mut counts = MeasurementCounts::new();
    for _ in 0..n_shots {
        let outcome = distribution.sample(rng) as u64;
        *counts.entry(outcome).or_insert(0.0) += 1.0;
    }
    Ok(counts)
}

/// Perform ideal sampling from a state vector
///
/// Returns every basis pattern's probability mass multiplied by the shot
/// count, with no randomness involved.
///
/// # Errors
/// Same validation as [`sample_from_state_vector`].
pub fn ideal_sample_from_state_vector(
    state_vector: &[Complex64],
    n_shots: usize,
) -> Result<MeasurementCounts> {
    if n_shots == 0 {
        return Err(EstimatorError::InvalidShotCount(n_shots));
    }
    let probabilities = basis_probabilities(state_vector)?;
    Ok(probabilities
        .into_iter()
        .enumerate()
        .map(|(pattern, probability)| (pattern as u64, probability * n_shots as f64))
        .collect())
}

/// Sample a circuit once through a backend and return its counts
///
/// Submits one job and blocks on its result; backend failures propagate
/// verbatim.
pub fn sample_with_backend<B: SamplingBackend>(
    backend: &B,
    circuit: &B::Circuit,
    n_shots: usize,
) -> Result<MeasurementCounts> {
    let job = backend.sample(circuit, n_shots)?;
    Ok(job.result()?.counts())
}

/// Sample a batch of circuits through a backend
///
/// Every job is submitted before any result is awaited, so independent
/// submissions overlap on backends that run jobs asynchronously. Results
/// are returned in request order; the first failure fails the batch.
pub fn sample_batch_with_backend<B: SamplingBackend>(
    backend: &B,
    requests: &[(&B::Circuit, usize)],
) -> Result<Vec<MeasurementCounts>> {
    let jobs = requests
        .iter()
        .map(|&(circuit, n_shots)| backend.sample(circuit, n_shots))
        .collect::<varq_backend::Result<Vec<_>>>()?;
    jobs.iter().map(|job| Ok(job.result()?.counts())).collect()
}
