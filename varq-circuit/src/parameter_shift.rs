//! Analytic derivatives via the parameter shift rule
//!
//! For a parametric gate U(θ) = exp(-iθG/2) where G is a generator with
//! eigenvalues ±1, the derivative of an expectation value is exact:
//!
//! ∂⟨ψ(θ)|H|ψ(θ)⟩/∂θ = [⟨ψ(θ+π/2)|H|ψ(θ+π/2)⟩ - ⟨ψ(θ-π/2)|H|ψ(θ-π/2)⟩] / 2
//!
//! Free parameters enter raw gate angles through a fixed affine combination,
//! so differentiation composes the rule with the chain rule: each raw slot
//! with a nonzero linear coefficient m contributes a ±π/2-shifted evaluation
//! point weighted by ±m/2. Second derivatives apply the rule twice
//! (shift-of-shift), which can land several terms on the same shifted point;
//! such terms are merged by summing coefficients.
//!
//! Shift offsets are exact multiples of π/2, so realized evaluation points
//! are reproducible bit-for-bit and safe to use as exact-equality keys.

use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;

use crate::error::Result;
use crate::mapping::{LinearParameterMapping, ParameterMapping};
use crate::parameter::ParameterId;

/// Accumulated half-π shifts applied to raw parameter slots
///
/// Each entry `(slot, k)` means "add `k·π/2` to that slot's raw value",
/// with `k` a nonzero integer. Entries are kept sorted by slot, so shifts
/// built along different differentiation paths compare equal when they
/// denote the same evaluation point, and the derived `Ord` gives term lists
/// a deterministic order.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawShift {
    entries: SmallVec<[(usize, i32); 2]>,
}

impl RawShift {
    /// The unshifted base point
    pub fn base() -> Self {
        Self::default()
    }

    /// Returns a copy with `step` more half-π units applied to `slot`
    ///
    /// Opposite shifts on the same slot cancel exactly; a slot whose
    /// accumulated shift reaches zero drops out of the set.
    pub fn shifted(&self, slot: usize, step: i32) -> Self {
        let mut entries = self.entries.clone();
        match entries.binary_search_by_key(&slot, |&(s, _)| s) {
            Ok(pos) => {
                entries[pos].1 += step;
                if entries[pos].1 == 0 {
                    entries.remove(pos);
                }
            }
            Err(pos) => {
                if step != 0 {
                    entries.insert(pos, (slot, step));
                }
            }
        }
        Self { entries }
    }

    /// Iterate over `(slot, half-π units)` entries in slot order
    pub fn entries(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.entries.iter().copied()
    }

    /// Whether this is the unshifted base point
    #[inline]
    pub fn is_base(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One term of an analytic derivative: a shifted evaluation point and the
/// signed weight its expectation value contributes
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftTerm {
    /// Shifts to apply to the base raw-parameter vector
    pub shift: RawShift,
    /// Weight of the expectation value at the shifted point
    pub coefficient: f64,
}

impl ShiftTerm {
    /// The identity term: unshifted point with weight 1
    pub fn base() -> Self {
        Self {
            shift: RawShift::base(),
            coefficient: 1.0,
        }
    }
}

/// Derives exact shift-rule terms for a linear parameter mapping
///
/// # Example
/// ```
/// use varq_circuit::{AffineExpr, LinearParameterMapping, ShiftedParameters};
///
/// let mut mapping = LinearParameterMapping::new();
/// let theta = mapping.add_parameter("theta");
/// mapping.add_raw_slot(AffineExpr::term(theta, 1.0)).unwrap();
///
/// let shifted = ShiftedParameters::new(&mapping);
/// let terms = shifted.gradient_terms(theta);
///
/// // Two evaluation points: θ−π/2 with weight −1/2, θ+π/2 with weight +1/2.
/// assert_eq!(terms.len(), 2);
/// assert_eq!(terms[0].coefficient, -0.5);
/// assert_eq!(terms[1].coefficient, 0.5);
/// ```
pub struct ShiftedParameters<'a> {
    mapping: &'a LinearParameterMapping,
}

impl<'a> ShiftedParameters<'a> {
    /// Create a deriver over a linear mapping
    pub fn new(mapping: &'a LinearParameterMapping) -> Self {
        Self { mapping }
    }

    /// The underlying mapping
    pub fn mapping(&self) -> &LinearParameterMapping {
        self.mapping
    }

    /// Differentiate a list of shift terms with respect to one parameter
    ///
    /// Applies the shift rule through the chain rule: every raw slot whose
    /// linear coefficient for `param` is nonzero (an exact check, never a
    /// tolerance) splits each input term into a ±π/2-shifted pair. Terms
    /// landing on the same shifted point are merged by summing coefficients,
    /// and merged terms whose coefficient cancels to exactly zero are
    /// dropped. The result is ordered by shift and deterministic.
    pub fn differentiate(&self, terms: &[ShiftTerm], param: ParameterId) -> Vec<ShiftTerm> {
        let mut merged: BTreeMap<RawShift, f64> = BTreeMap::new();
        for term in terms {
            for (slot, expr) in self.mapping.slots().iter().enumerate() {
                let m = expr.coefficient(param);
                if m == 0.0 {
                    continue;
                }
                let weight = term.coefficient * m / 2.0;
                *merged.entry(term.shift.shifted(slot, 1)).or_insert(0.0) += weight;
                *merged.entry(term.shift.shifted(slot, -1)).or_insert(0.0) -= weight;
            }
        }
        merged
            .into_iter()
            .filter(|&(_, coefficient)| coefficient != 0.0)
            .map(|(shift, coefficient)| ShiftTerm { shift, coefficient })
            .collect()
    }

    /// First-derivative terms with respect to one free parameter
    ///
    /// A parameter with no dependent slot yields an empty list: its
    /// derivative is zero and costs no evaluation.
    pub fn gradient_terms(&self, param: ParameterId) -> Vec<ShiftTerm> {
        self.differentiate(&[ShiftTerm::base()], param)
    }

    /// Second-derivative terms with respect to a pair of free parameters
    ///
    /// Applies the shift rule twice (shift-of-shift), producing up to four
    /// terms per slot pair before merging. The pair is differentiated
    /// independently of its transpose; symmetry of the resulting Hessian is
    /// a property of the estimates, not of this construction.
    pub fn hessian_terms(&self, param_i: ParameterId, param_j: ParameterId) -> Vec<ShiftTerm> {
        self.differentiate(&self.gradient_terms(param_i), param_j)
    }

    /// Realize symbolic terms at a numeric point in free-parameter space
    ///
    /// Maps `params` through the underlying mapping once, then offsets the
    /// named slots by exact multiples of π/2 per term. Identical shifts
    /// therefore produce bit-identical vectors.
    ///
    /// # Errors
    /// Fails with [`CircuitError::ParameterCountMismatch`] if `params` does
    /// not match the declared parameter count.
    ///
    /// [`CircuitError::ParameterCountMismatch`]: crate::CircuitError::ParameterCountMismatch
    pub fn realize(&self, terms: &[ShiftTerm], params: &[f64]) -> Result<Vec<(Vec<f64>, f64)>> {
        let base = self.mapping.apply(params)?;
        Ok(terms
            .iter()
            .map(|term| {
                let mut raw = base.clone();
                for (slot, units) in term.shift.entries() {
                    raw[slot] += f64::from(units) * FRAC_PI_2;
                }
                (raw, term.coefficient)
            })
            .collect())
    }
}
