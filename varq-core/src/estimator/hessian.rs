//! Parameter-shift Hessians of expectation values

use varq_circuit::ShiftedParameters;

use crate::error::Result;
use crate::estimator::dedup::ParameterBatch;
use crate::estimator::{estimate_unique, linear_mapping_for, ConcurrentParametricEstimator, Estimate};
use crate::state::ParametricState;

/// A Hessian of an expectation value with respect to free parameters
///
/// Entries are real: the observable is assumed Hermitian and the real part
/// of each complex estimate is taken during accumulation. That projection
/// happens here and nowhere else; see
/// [`parameter_shift_hessian_estimates`].
#[derive(Debug, Clone, PartialEq)]
pub struct HessianEstimates {
    values: Vec<Vec<f64>>,
    num_evaluations: usize,
}

impl HessianEstimates {
    /// The dense matrix, row `i` holding ∂²E/∂xᵢ∂xⱼ for each `j`
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Matrix dimension (the free-parameter count)
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// Number of unique circuit evaluations the Hessian cost
    pub fn num_evaluations(&self) -> usize {
        self.num_evaluations
    }
}

/// Estimate the Hessian of an operator's expectation value using the
/// parameter shift rule applied twice
///
/// Every (i, j) entry gets its own shift-of-shift term list, derived
/// independently of its transpose; coincident evaluation points across all
/// entries are deduplicated so each unique raw-parameter vector is
/// estimated exactly once. Accumulation takes `coefficient × Re(estimate)`:
/// the real-part projection is this function's documented policy for
/// Hermitian observables, not an implicit cast.
///
/// # Errors
/// Same taxonomy as
/// [`parameter_shift_gradient_estimates`](crate::estimator::parameter_shift_gradient_estimates):
/// non-affine states and mis-sized parameter vectors are rejected before
/// any estimator call, and a failed batch fails the whole matrix.
pub fn parameter_shift_hessian_estimates<Op, St, E>(
    operator: &Op,
    state: &St,
    params: &[f64],
    estimator: &E,
) -> Result<HessianEstimates>
where
    Op: ?Sized,
    St: ParametricState + ?Sized,
    E: ConcurrentParametricEstimator<Op, St> + ?Sized,
{
    let mapping = linear_mapping_for(state, params)?;
    let shifted = ShiftedParameters::new(mapping);
    let ids: Vec<_> = mapping.parameter_ids().collect();

    let mut batch = ParameterBatch::new();
    let mut entries: Vec<Vec<Vec<(usize, f64)>>> = Vec::with_capacity(ids.len());
    for &i in &ids {
        let mut row = Vec::with_capacity(ids.len());
        for &j in &ids {
            let realized = shifted.realize(&shifted.hessian_terms(i, j), params)?;
            row.push(
                realized
                    .into_iter()
                    .map(|(vector, coefficient)| (batch.insert(vector), coefficient))
                    .collect::<Vec<_>>(),
            );
        }
        entries.push(row);
    }

    let estimates = estimate_unique(operator, state, &batch, estimator)?;
    let values = entries
        .iter()
        .map(|row| {
            row.iter()
                .map(|terms| {
                    terms
                        .iter()
                        .map(|&(index, coefficient)| estimates[index].value().re * coefficient)
                        .sum()
                })
                .collect()
        })
        .collect();

    Ok(HessianEstimates {
        values,
        num_evaluations: batch.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ParametricCircuitState;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;
    use std::f64::consts::FRAC_PI_3;
    use varq_circuit::{AffineExpr, LinearParameterMapping};

    #[test]
    fn test_hessian_of_cosine() {
        let mut mapping = LinearParameterMapping::new();
        let theta = mapping.add_parameter("theta");
        mapping.add_raw_slot(AffineExpr::term(theta, 1.0)).unwrap();
        let state = ParametricCircuitState::new((), mapping);

        let estimator = |_: &(), _: &ParametricCircuitState<()>, sets: &[Vec<f64>]| {
            Ok(sets
                .iter()
                .map(|raw| Complex64::new(raw[0].cos(), 0.0))
                .collect::<Vec<_>>())
        };

        let hessian =
            parameter_shift_hessian_estimates(&(), &state, &[FRAC_PI_3], &estimator).unwrap();
        assert_eq!(hessian.dim(), 1);
        assert_abs_diff_eq!(hessian.values()[0][0], -FRAC_PI_3.cos(), epsilon = 1e-9);
        // θ−π, θ, θ+π: three unique points for a 1×1 Hessian.
        assert_eq!(hessian.num_evaluations(), 3);
    }

    #[test]
    fn test_hessian_imaginary_parts_are_dropped_explicitly() {
        let mut mapping = LinearParameterMapping::new();
        let theta = mapping.add_parameter("theta");
        mapping.add_raw_slot(AffineExpr::term(theta, 1.0)).unwrap();
        let state = ParametricCircuitState::new((), mapping);

        // An estimator with a constant imaginary component: the projection
        // must keep only the real part of each estimate.
        let estimator = |_: &(), _: &ParametricCircuitState<()>, sets: &[Vec<f64>]| {
            Ok(sets
                .iter()
                .map(|raw| Complex64::new(raw[0].cos(), 123.0))
                .collect::<Vec<_>>())
        };

        let hessian =
            parameter_shift_hessian_estimates(&(), &state, &[0.4], &estimator).unwrap();
        assert_abs_diff_eq!(hessian.values()[0][0], -(0.4f64).cos(), epsilon = 1e-9);
    }
}
