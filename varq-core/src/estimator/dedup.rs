//! Exact deduplication of raw-parameter vectors
//!
//! Derivative term lists from different entries frequently land on the
//! same shifted evaluation point. Before anything is submitted to an
//! estimator, vectors are collapsed to a unique set so each circuit
//! evaluation happens at most once per derivative-computation call.
//!
//! Keys are the exact bit patterns of the vector elements: shift vectors
//! are constructed as base value ± fixed constants, so identical points are
//! bit-identical and no rounding or tolerance is involved. The batch lives
//! for a single call and is never shared or persisted.

use ahash::AHashMap;

/// Bit-for-bit equality key of an `f64` vector
///
/// Two keys compare equal iff every element has the same bit pattern.
/// Note this distinguishes `0.0` from `-0.0` and values differing by one
/// ulp: exactness is the point, closeness is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterKey(Vec<u64>);

impl ParameterKey {
    /// Key a vector by the bit patterns of its elements
    pub fn new(values: &[f64]) -> Self {
        Self(values.iter().map(|v| v.to_bits()).collect())
    }
}

/// Insertion-ordered set of unique raw-parameter vectors
///
/// `insert` returns the stable index of the vector, whether it was new or
/// already present; `vectors()` is the submission batch in first-seen
/// order, so estimator results zip back positionally.
///
/// # Example
/// ```
/// use varq_core::estimator::ParameterBatch;
///
/// let mut batch = ParameterBatch::new();
/// assert_eq!(batch.insert(vec![0.0, 1.0]), 0);
/// assert_eq!(batch.insert(vec![2.0, 3.0]), 1);
/// assert_eq!(batch.insert(vec![0.0, 1.0]), 0);
/// assert_eq!(batch.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ParameterBatch {
    vectors: Vec<Vec<f64>>,
    index: AHashMap<ParameterKey, usize>,
}

impl ParameterBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vector, returning its stable index
    pub fn insert(&mut self, vector: Vec<f64>) -> usize {
        let key = ParameterKey::new(&vector);
        if let Some(&index) = self.index.get(&key) {
            return index;
        }
        let index = self.vectors.len();
        self.index.insert(key, index);
        self.vectors.push(vector);
        index
    }

    /// Look up the index of a previously inserted vector
    pub fn index_of(&self, vector: &[f64]) -> Option<usize> {
        self.index.get(&ParameterKey::new(vector)).copied()
    }

    /// The unique vectors in first-seen order
    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }

    /// Number of unique vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
