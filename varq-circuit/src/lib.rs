//! Parameter machinery for parametric expectation estimation
//!
//! This crate provides the classical side of a parametric quantum circuit:
//! - [`ParameterId`] / [`Parameter`]: free-parameter identity
//! - [`LinearParameterMapping`]: affine mapping from free parameters to raw
//!   gate parameters
//! - [`ShiftedParameters`]: exact derivative terms via the parameter shift
//!   rule
//!
//! # Example
//! ```
//! use varq_circuit::{AffineExpr, LinearParameterMapping, ShiftedParameters};
//!
//! let mut mapping = LinearParameterMapping::new();
//! let theta = mapping.add_parameter("theta");
//! mapping.add_raw_slot(AffineExpr::term(theta, 1.0)).unwrap();
//!
//! let terms = ShiftedParameters::new(&mapping).gradient_terms(theta);
//! assert_eq!(terms.len(), 2);
//! ```

pub mod error;
pub mod finite_difference;
pub mod mapping;
pub mod parameter;
pub mod parameter_shift;

// Re-exports for convenience
pub use error::{CircuitError, Result};
pub use mapping::{AffineExpr, LinearParameterMapping, ParameterMapping};
pub use parameter::{Parameter, ParameterId};
pub use parameter_shift::{RawShift, ShiftTerm, ShiftedParameters};
