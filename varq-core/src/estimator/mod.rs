//! Expectation-value estimation interfaces
//!
//! The engine decides which raw-parameter vectors to evaluate; an injected
//! estimator does the evaluating. [`ConcurrentParametricEstimator`] is that
//! seam: it receives the full batch of unique vectors and must return one
//! estimate per vector, in input order. How it evaluates them (serial,
//! rayon, remote submission) is its own business.

pub mod dedup;
pub mod gradient;
pub mod hessian;

use num_complex::Complex64;
use rayon::prelude::*;
use varq_circuit::{CircuitError, LinearParameterMapping, ParameterMapping};

use crate::error::{EstimatorError, Result};
use crate::state::ParametricState;

pub use dedup::{ParameterBatch, ParameterKey};
pub use gradient::{parameter_shift_gradient_estimates, GradientEstimates};
pub use hessian::{parameter_shift_hessian_estimates, HessianEstimates};

/// An expectation-value estimate
///
/// Estimates stay complex throughout the engine; any projection to the
/// real part is an explicit step at an accumulation boundary, never an
/// implicit cast.
pub trait Estimate {
    /// The estimated expectation value
    fn value(&self) -> Complex64;

    /// One-sigma uncertainty of the estimate (NaN when unknown)
    fn error(&self) -> f64 {
        f64::NAN
    }
}

/// A plain value/uncertainty pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectationEstimate {
    /// Estimated expectation value
    pub value: Complex64,
    /// One-sigma uncertainty (NaN when unknown)
    pub error: f64,
}

impl ExpectationEstimate {
    /// An estimate with unknown uncertainty
    pub fn new(value: Complex64) -> Self {
        Self {
            value,
            error: f64::NAN,
        }
    }

    /// An estimate with a known uncertainty
    pub fn with_error(value: Complex64, error: f64) -> Self {
        Self { value, error }
    }
}

impl Estimate for ExpectationEstimate {
    fn value(&self) -> Complex64 {
        self.value
    }

    fn error(&self) -> f64 {
        self.error
    }
}

/// Bare complex values act as exact estimates
impl Estimate for Complex64 {
    fn value(&self) -> Complex64 {
        *self
    }
}

/// Estimates expectation values of an operator on a parametric state at a
/// batch of raw-parameter vectors
///
/// # Contract
/// - Exactly one estimate per input vector, in input order; concurrent or
///   out-of-order completion internally is fine as long as the returned
///   sequence is positional.
/// - Vectors are **raw** gate-parameter values: implementations bind them
///   directly to the state's parametric slots, bypassing the free-parameter
///   mapping.
/// - Any failure fails the whole batch.
///
/// Implemented for any compatible `Fn` closure, so a test estimator is one
/// line.
pub trait ConcurrentParametricEstimator<Op: ?Sized, St: ?Sized> {
    /// The estimate type produced by this estimator
    type Estimate: Estimate;

    /// Estimate the operator's expectation value at every parameter vector
    fn estimate(
        &self,
        operator: &Op,
        state: &St,
        param_sets: &[Vec<f64>],
    ) -> Result<Vec<Self::Estimate>>;
}

impl<Op: ?Sized, St: ?Sized, F, Est> ConcurrentParametricEstimator<Op, St> for F
where
    Est: Estimate,
    F: Fn(&Op, &St, &[Vec<f64>]) -> Result<Vec<Est>>,
{
    type Estimate = Est;

    fn estimate(
        &self,
        operator: &Op,
        state: &St,
        param_sets: &[Vec<f64>],
    ) -> Result<Vec<Est>> {
        self(operator, state, param_sets)
    }
}

/// Build a concurrent estimator from a single-point estimator
///
/// The returned estimator evaluates each vector of a batch in parallel
/// with rayon; the collected results keep the input order. The first
/// failing point fails the batch.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use varq_core::estimator::{concurrent_estimator, ConcurrentParametricEstimator};
///
/// let estimator = concurrent_estimator(|_op: &(), _state: &(), raw: &[f64]| {
///     Ok(Complex64::new(raw[0].cos(), 0.0))
/// });
///
/// let batch = vec![vec![0.0], vec![std::f64::consts::PI]];
/// let estimates = estimator.estimate(&(), &(), &batch).unwrap();
/// assert_eq!(estimates[0].re, 1.0);
/// assert_eq!(estimates[1].re, -1.0);
/// ```
pub fn concurrent_estimator<Op, St, F, Est>(
    point_estimator: F,
) -> impl Fn(&Op, &St, &[Vec<f64>]) -> Result<Vec<Est>>
where
    Op: Sync + ?Sized,
    St: Sync + ?Sized,
    Est: Estimate + Send,
    F: Fn(&Op, &St, &[f64]) -> Result<Est> + Sync,
{
    move |operator: &Op, state: &St, param_sets: &[Vec<f64>]| {
        param_sets
            .par_iter()
            .map(|params| point_estimator(operator, state, params))
            .collect()
    }
}

/// Resolve a state's linear mapping and validate the parameter vector
///
/// Both derivative entry points fail fast here, before any estimator call:
/// non-affine mappings and mis-sized parameter vectors never cost an
/// evaluation.
pub(crate) fn linear_mapping_for<'a, St>(
    state: &'a St,
    params: &[f64],
) -> Result<&'a LinearParameterMapping>
where
    St: ParametricState + ?Sized,
{
    let mapping = state.parameter_mapping().as_linear().ok_or_else(|| {
        EstimatorError::UnsupportedState(
            "parameter mapping is not exactly affine in the free parameters".to_string(),
        )
    })?;
    if params.len() != mapping.in_len() {
        return Err(CircuitError::ParameterCountMismatch {
            expected: mapping.in_len(),
            actual: params.len(),
        }
        .into());
    }
    Ok(mapping)
}

/// Submit a deduplicated batch and enforce the one-estimate-per-vector
/// contract
///
/// An empty batch skips the estimator entirely.
pub(crate) fn estimate_unique<Op, St, E>(
    operator: &Op,
    state: &St,
    batch: &ParameterBatch,
    estimator: &E,
) -> Result<Vec<E::Estimate>>
where
    Op: ?Sized,
    St: ?Sized,
    E: ConcurrentParametricEstimator<Op, St> + ?Sized,
{
    if batch.is_empty() {
        return Ok(Vec::new());
    }
    let estimates = estimator.estimate(operator, state, batch.vectors())?;
    if estimates.len() != batch.len() {
        return Err(EstimatorError::EstimateCountMismatch {
            expected: batch.len(),
            actual: estimates.len(),
        });
    }
    Ok(estimates)
}
