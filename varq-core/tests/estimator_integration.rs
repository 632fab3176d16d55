//! End-to-end estimation tests against exact analytic estimators

use approx::assert_abs_diff_eq;
use num_complex::Complex64;
use std::cell::RefCell;
use std::f64::consts::FRAC_PI_3;
use varq_circuit::finite_difference::central_difference_gradient;
use varq_circuit::{AffineExpr, LinearParameterMapping, ParameterMapping};
use varq_core::estimator::{
    concurrent_estimator, parameter_shift_gradient_estimates,
    parameter_shift_hessian_estimates, ExpectationEstimate,
};
use varq_core::state::{ParametricCircuitState, ParametricState};
use varq_core::{EstimatorError, Result};

fn rotation_state() -> ParametricCircuitState<()> {
    let mut mapping = LinearParameterMapping::new();
    let theta = mapping.add_parameter("theta");
    mapping.add_raw_slot(AffineExpr::term(theta, 1.0)).unwrap();
    ParametricCircuitState::new((), mapping)
}

fn two_rotation_state() -> ParametricCircuitState<()> {
    let mut mapping = LinearParameterMapping::new();
    let a = mapping.add_parameter("a");
    let b = mapping.add_parameter("b");
    mapping.add_raw_slot(AffineExpr::term(a, 1.0)).unwrap();
    mapping.add_raw_slot(AffineExpr::term(b, 1.0)).unwrap();
    ParametricCircuitState::new((), mapping)
}

#[test]
fn gradient_of_z_expectation_at_pi_third() {
    // 1-qubit circuit with one rotation, observable Z: E(θ) = cos θ.
    let state = rotation_state();
    let estimator = |_: &(), _: &ParametricCircuitState<()>, sets: &[Vec<f64>]| {
        Ok(sets
            .iter()
            .map(|raw| ExpectationEstimate::with_error(Complex64::new(raw[0].cos(), 0.0), 0.0))
            .collect::<Vec<_>>())
    };

    let gradient =
        parameter_shift_gradient_estimates(&(), &state, &[FRAC_PI_3], &estimator).unwrap();
    assert_abs_diff_eq!(gradient.values()[0].re, -FRAC_PI_3.sin(), epsilon = 1e-9);
}

#[test]
fn hessian_of_z_expectation_at_pi_third() {
    let state = rotation_state();
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
}

#[test]
fn gradient_agrees_with_finite_differences() {
    let state = two_rotation_state();
    let expectation = |raw: &[f64]| raw[0].cos() * raw[1].cos();
    let estimator = |_: &(), _: &ParametricCircuitState<()>, sets: &[Vec<f64>]| {
        Ok(sets
            .iter()
            .map(|raw| Complex64::new(expectation(raw), 0.0))
            .collect::<Vec<_>>())
    };

    let point = [0.8, -1.1];
    let gradient = parameter_shift_gradient_estimates(&(), &state, &point, &estimator).unwrap();

    let mapping = state.mapping();
    let reference = central_difference_gradient(
        |params| expectation(&mapping.apply(params).unwrap()),
        &point,
        1e-6,
    );
    for (value, expected) in gradient.values().iter().zip(reference) {
        assert_abs_diff_eq!(value.re, expected, epsilon = 1e-6);
    }
}

#[test]
fn hessian_is_symmetric_for_hermitian_observable() {
    let state = two_rotation_state();
    let estimator = |_: &(), _: &ParametricCircuitState<()>, sets: &[Vec<f64>]| {
        Ok(sets
            .iter()
            .map(|raw| Complex64::new(raw[0].cos() * raw[1].cos(), 0.0))
            .collect::<Vec<_>>())
    };

    let point = [0.9, 0.3];
    let hessian = parameter_shift_hessian_estimates(&(), &state, &point, &estimator).unwrap();

    let values = hessian.values();
    assert_abs_diff_eq!(values[0][1], values[1][0], epsilon = 1e-9);
    assert_abs_diff_eq!(
        values[0][1],
        point[0].sin() * point[1].sin(),
        epsilon = 1e-9
    );
}

#[test]
fn no_parameter_vector_is_submitted_twice() {
    // Two parameters feeding three slots, one shared: the Hessian term
    // lists overlap heavily across (i, j) entries.
    let mut mapping = LinearParameterMapping::new();
    let a = mapping.add_parameter("a");
    let b = mapping.add_parameter("b");
    mapping.add_raw_slot(AffineExpr::term(a, 1.0)).unwrap();
    mapping.add_raw_slot(AffineExpr::term(b, 1.0)).unwrap();
    mapping
        .add_raw_slot(AffineExpr::term(a, 1.0).plus_term(b, 1.0))
        .unwrap();
    let state = ParametricCircuitState::new((), mapping);

    let submitted: RefCell<Vec<Vec<f64>>> = RefCell::new(Vec::new());
    let calls = RefCell::new(0usize);
    let estimator = |_: &(), _: &ParametricCircuitState<()>, sets: &[Vec<f64>]| {
        *calls.borrow_mut() += 1;
        submitted.borrow_mut().extend(sets.iter().cloned());
        Ok(sets
            .iter()
            .map(|raw| Complex64::new(raw.iter().map(|t| t.cos()).sum(), 0.0))
            .collect::<Vec<_>>())
    };

    parameter_shift_hessian_estimates(&(), &state, &[0.2, 0.5], &estimator).unwrap();

    assert_eq!(*calls.borrow(), 1);
    let submitted = submitted.borrow();
    for (i, left) in submitted.iter().enumerate() {
        for right in submitted.iter().skip(i + 1) {
            let same_bits = left
                .iter()
                .zip(right.iter())
                .all(|(x, y)| x.to_bits() == y.to_bits());
            assert!(!same_bits, "vector {:?} submitted twice", left);
        }
    }
}

#[test]
fn rayon_point_estimator_drives_the_gradient() {
    let state = rotation_state();
    let estimator =
        concurrent_estimator(|_: &(), _: &ParametricCircuitState<()>, raw: &[f64]| {
            Ok(Complex64::new(raw[0].sin(), 0.0))
        });

    let gradient =
        parameter_shift_gradient_estimates(&(), &state, &[0.0], &estimator).unwrap();
    // d sin/dθ at 0 is 1.
    assert_abs_diff_eq!(gradient.values()[0].re, 1.0, epsilon = 1e-9);
}

struct OpaqueMapping;

impl ParameterMapping for OpaqueMapping {
    fn in_len(&self) -> usize {
        1
    }

    fn out_len(&self) -> usize {
        1
    }

    fn apply(&self, values: &[f64]) -> varq_circuit::Result<Vec<f64>> {
        // Deliberately nonlinear: the shift rule would be inexact here.
        Ok(vec![values[0].powi(2)])
    }
}

struct OpaqueState {
    mapping: OpaqueMapping,
}

impl ParametricState for OpaqueState {
    fn parameter_mapping(&self) -> &dyn ParameterMapping {
        &self.mapping
    }
}

#[test]
fn non_affine_state_is_rejected_before_estimation() {
    let state = OpaqueState {
        mapping: OpaqueMapping,
    };
    let estimator = |_: &(), _: &OpaqueState, _: &[Vec<f64>]| -> Result<Vec<Complex64>> {
        panic!("estimator must not be called for a non-affine state");
    };

    let result = parameter_shift_gradient_estimates(&(), &state, &[0.5], &estimator);
    assert!(matches!(result, Err(EstimatorError::UnsupportedState(_))));
}

#[test]
fn estimator_breaking_its_contract_is_detected() {
    let state = rotation_state();
    let estimator = |_: &(), _: &ParametricCircuitState<()>, _: &[Vec<f64>]| {
        Ok(vec![Complex64::new(1.0, 0.0)]) // always one estimate, whatever was asked
    };

    let result = parameter_shift_hessian_estimates(&(), &state, &[0.1], &estimator);
    assert!(matches!(
        result,
        Err(EstimatorError::EstimateCountMismatch { expected: 3, actual: 1 })
    ));
}

#[test]
fn estimator_failure_fails_the_whole_gradient() {
    let state = rotation_state();
    let estimator = |_: &(), _: &ParametricCircuitState<()>, _: &[Vec<f64>]| -> Result<Vec<Complex64>> {
        Err(varq_backend::BackendError::Unavailable("offline".to_string()).into())
    };

    let result = parameter_shift_gradient_estimates(&(), &state, &[0.1], &estimator);
    assert!(matches!(result, Err(EstimatorError::Backend(_))));
}
