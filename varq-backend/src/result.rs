//! Sampling measurement results

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Count statistics of a sampling measurement
///
/// Keys are observed bit patterns encoded as integers (`0 ≤ key < 2^n`
/// for an `n`-qubit measurement); values are observation counts or the
/// probability mass of the corresponding pattern. Integer counts and
/// shot-weighted probabilities share this representation: which one a map
/// holds is a convention of the producing backend, not a property of the
/// type, and callers must not assume one without checking context.
pub type SamplingCounts = HashMap<u64, f64>;

/// A result of a sampling job
pub trait SamplingResult: Send + Sync {
    /// Measurement counts obtained by the sampling measurement
    fn counts(&self) -> SamplingCounts;
}

/// A plain single-run sampling result
///
/// # Example
/// ```
/// use varq_backend::{CountsResult, SamplingResult};
///
/// let result = CountsResult::new([(0b00, 40.0), (0b11, 60.0)]);
/// assert_eq!(result.counts()[&0b11], 60.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountsResult {
    counts: SamplingCounts,
}

impl CountsResult {
    /// Create a result from bit-pattern counts
    pub fn new(counts: impl IntoIterator<Item = (u64, f64)>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
        }
    }

    /// Total observed mass (shot count, or 1 for normalized results)
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }
}

impl SamplingResult for CountsResult {
    fn counts(&self) -> SamplingCounts {
        self.counts.clone()
    }
}

/// A sampling result merged from multiple sampling results
///
/// `counts` is the element-wise sum over the member results: keys absent
/// from a member contribute zero, and the total mass of the composite
/// equals the sum of the members' masses.
pub struct CompositeSamplingResult {
    results: Vec<Box<dyn SamplingResult>>,
}

impl CompositeSamplingResult {
    /// Merge a collection of results
    pub fn new(results: Vec<Box<dyn SamplingResult>>) -> Self {
        Self { results }
    }

    /// The member results
    pub fn results(&self) -> &[Box<dyn SamplingResult>] {
        &self.results
    }
}

impl SamplingResult for CompositeSamplingResult {
    fn counts(&self) -> SamplingCounts {
        let mut total = SamplingCounts::new();
        for result in &self.results {
            for (pattern, mass) in result.counts() {
                *total.entry(pattern).or_insert(0.0) += mass;
            }
        }
        total
    }
}
