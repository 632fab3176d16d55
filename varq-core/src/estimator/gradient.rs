//! Parameter-shift gradients of expectation values

use num_complex::Complex64;
use varq_circuit::{ParameterMapping, ShiftedParameters};

use crate::error::Result;
use crate::estimator::dedup::ParameterBatch;
use crate::estimator::{estimate_unique, linear_mapping_for, ConcurrentParametricEstimator, Estimate};
use crate::state::ParametricState;

/// A gradient of an expectation value with respect to free parameters
///
/// Values stay complex; callers working with Hermitian observables take
/// the real part themselves, explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientEstimates {
    values: Vec<Complex64>,
    num_evaluations: usize,
}

impl GradientEstimates {
    /// Derivative per free parameter, in declaration order
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Number of free parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the state declares no free parameters
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of unique circuit evaluations the gradient cost
    pub fn num_evaluations(&self) -> usize {
        self.num_evaluations
    }
}

/// Estimate the gradient of an operator's expectation value using the
/// parameter shift rule
///
/// Derives the exact shift terms for every free parameter, collapses the
/// shifted evaluation points to a unique batch, issues a single call to the
/// injected estimator, and accumulates `coefficient × estimate` per entry.
/// A parameter with no dependent raw slot costs no evaluation and gets an
/// exact zero.
///
/// # Errors
/// - [`EstimatorError::UnsupportedState`] if the state's mapping is not
///   exactly affine (checked before any estimator call).
/// - [`EstimatorError::Circuit`] if `params` does not match the declared
///   parameter count.
/// - Any estimator failure, verbatim; a failed batch fails the whole
///   gradient.
///
/// [`EstimatorError::UnsupportedState`]: crate::EstimatorError::UnsupportedState
/// [`EstimatorError::Circuit`]: crate::EstimatorError::Circuit
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use varq_circuit::{AffineExpr, LinearParameterMapping};
/// use varq_core::estimator::parameter_shift_gradient_estimates;
/// use varq_core::state::ParametricCircuitState;
///
/// let mut mapping = LinearParameterMapping::new();
/// let theta = mapping.add_parameter("theta");
/// mapping.add_raw_slot(AffineExpr::term(theta, 1.0)).unwrap();
/// let state = ParametricCircuitState::new((), mapping);
///
/// // Exact analytic estimator: E(θ) = cos θ.
/// let estimator = |_: &(), _: &ParametricCircuitState<()>, sets: &[Vec<f64>]| {
///     Ok(sets.iter().map(|raw| Complex64::new(raw[0].cos(), 0.0)).collect::<Vec<_>>())
/// };
///
/// let gradient =
///     parameter_shift_gradient_estimates(&(), &state, &[0.0], &estimator).unwrap();
/// assert!(gradient.values()[0].re.abs() < 1e-12); // d cos/dθ at 0
/// ```
pub fn parameter_shift_gradient_estimates<Op, St, E>(
    operator: &Op,
    state: &St,
    params: &[f64],
    estimator: &E,
) -> Result<GradientEstimates>
where
    Op: ?Sized,
    St: ParametricState + ?Sized,
    E: ConcurrentParametricEstimator<Op, St> + ?Sized,
{
    let mapping = linear_mapping_for(state, params)?;
    let shifted = ShiftedParameters::new(mapping);

    let mut batch = ParameterBatch::new();
    let mut entries: Vec<Vec<(usize, f64)>> = Vec::with_capacity(mapping.in_len());
    for id in mapping.parameter_ids() {
        let realized = shifted.realize(&shifted.gradient_terms(id), params)?;
        entries.push(
            realized
                .into_iter()
                .map(|(vector, coefficient)| (batch.insert(vector), coefficient))
                .collect(),
        );
    }

    let estimates = estimate_unique(operator, state, &batch, estimator)?;
    let values = entries
        .iter()
        .map(|terms| {
            terms
                .iter()
                .map(|&(index, coefficient)| estimates[index].value() * coefficient)
                .sum()
        })
        .collect();

    Ok(GradientEstimates {
        values,
        num_evaluations: batch.len(),
    })
}
