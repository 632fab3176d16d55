//! Parameter-shift expectation estimation
//!
//! Given an observable, a parametric state whose gate angles are affine in
//! a small set of free parameters, and a numeric point in parameter space,
//! this crate computes exact gradients and Hessians of the expectation
//! value via the parameter shift rule:
//!
//! - [`estimator::parameter_shift_gradient_estimates`] /
//!   [`estimator::parameter_shift_hessian_estimates`]: derive the shifted
//!   evaluation points, deduplicate them, submit one batch to an injected
//!   estimator and accumulate the weighted results
//! - [`sampling`]: state-vector samplers, backend sampling adapters and
//!   shot allocators
//! - [`operator`]: Pauli observables and commuting groups
//!
//! The crate never executes circuits: the injected
//! [`estimator::ConcurrentParametricEstimator`] and the
//! [`varq_backend`] traits are the only seams to real execution.

pub mod error;
pub mod estimator;
pub mod operator;
pub mod sampling;
pub mod state;

// Re-exports for convenience
pub use error::{EstimatorError, Result};
pub use estimator::{
    concurrent_estimator, parameter_shift_gradient_estimates,
    parameter_shift_hessian_estimates, ConcurrentParametricEstimator, Estimate,
    ExpectationEstimate, GradientEstimates, HessianEstimates, ParameterBatch,
};
pub use num_complex::Complex64;
pub use operator::{CommutablePauliSet, Operator, Pauli, PauliString};
pub use state::{ParametricCircuitState, ParametricState};
