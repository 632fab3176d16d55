//! Central-difference reference gradients
//!
//! Numerical fallback for cross-checking the analytic shift rule. The
//! engine itself never uses finite differences; tests compare the two.

/// Central-difference gradient of a scalar function of the free parameters
///
/// For each parameter θᵢ, evaluates `f` at θᵢ ± ε and divides the difference
/// by 2ε.
///
/// # Example
/// ```
/// use varq_circuit::finite_difference::central_difference_gradient;
///
/// let grad = central_difference_gradient(|p| p[0] * p[0], &[3.0], 1e-6);
/// assert!((grad[0] - 6.0).abs() < 1e-4);
/// ```
pub fn central_difference_gradient<F>(f: F, params: &[f64], epsilon: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    (0..params.len())
        .map(|i| {
            let mut params_plus = params.to_vec();
            let mut params_minus = params.to_vec();
            params_plus[i] += epsilon;
            params_minus[i] -= epsilon;
            (f(&params_plus) - f(&params_minus)) / (2.0 * epsilon)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gradient_of_product() {
        let grad = central_difference_gradient(|p| p[0] * p[1], &[2.0, 5.0], 1e-6);
        assert_abs_diff_eq!(grad[0], 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(grad[1], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_empty_params() {
        let grad = central_difference_gradient(|_| 1.0, &[], 1e-6);
        assert!(grad.is_empty());
    }
}
