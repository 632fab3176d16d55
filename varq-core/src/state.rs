//! Parametric quantum states
//!
//! A parametric state is a circuit-backed state whose gate angles are
//! functions of free parameters. The circuit representation itself is an
//! external collaborator; this crate only requires access to the parameter
//! mapping, which is what differentiation consumes.

use varq_circuit::{LinearParameterMapping, ParameterMapping};

/// A quantum state parametrized by free parameters
pub trait ParametricState {
    /// The mapping from free parameters to the state's raw gate parameters
    fn parameter_mapping(&self) -> &dyn ParameterMapping;
}

/// A parametric state carrying an opaque circuit and its linear mapping
///
/// The circuit payload is never inspected here; it travels with the state
/// so an injected estimator can bind raw parameter vectors to it.
///
/// # Example
/// ```
/// use varq_circuit::{AffineExpr, LinearParameterMapping};
/// use varq_core::state::{ParametricCircuitState, ParametricState};
///
/// let mut mapping = LinearParameterMapping::new();
/// let theta = mapping.add_parameter("theta");
/// mapping.add_raw_slot(AffineExpr::term(theta, 1.0)).unwrap();
///
/// // The "circuit" can be any backend-native payload.
/// let state = ParametricCircuitState::new("rx q[0]", mapping);
/// assert_eq!(state.parameter_mapping().in_len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ParametricCircuitState<C> {
    circuit: C,
    mapping: LinearParameterMapping,
}

impl<C> ParametricCircuitState<C> {
    /// Pair a circuit with its parameter mapping
    pub fn new(circuit: C, mapping: LinearParameterMapping) -> Self {
        Self { circuit, mapping }
    }

    /// The circuit payload
    pub fn circuit(&self) -> &C {
        &self.circuit
    }

    /// The linear mapping in its concrete form
    pub fn mapping(&self) -> &LinearParameterMapping {
        &self.mapping
    }
}

impl<C> ParametricState for ParametricCircuitState<C> {
    fn parameter_mapping(&self) -> &dyn ParameterMapping {
        &self.mapping
    }
}
